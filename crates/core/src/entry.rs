//! Shared identity for console entries
//!
//! Commands and variables are separate types that expose the same
//! capability set through [`ConEntry`]: a name, a description, flags and
//! whether the entry shows up in listings.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Flags that control access, visibility and persistence of console entries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConFlags: u32 {
        /// Only mutable while cheats are enabled
        const CHEAT = 1 << 1;
        /// Not shown in listings or search
        const HIDDEN = 1 << 2;
        /// Value is saved at deregistration and restored at registration
        const CACHE = 1 << 3;
        /// Cannot be changed from the console. Still modifiable in code
        const READONLY = 1 << 4;
    }
}

impl ConFlags {
    /// No flags
    pub const NONE: Self = Self::empty();
}

/// Common interface of everything stored in a console registry
pub trait ConEntry: fmt::Display + Send + Sync + 'static {
    /// Unique entry name
    fn name(&self) -> &str;

    /// Help text, empty if none was given
    fn description(&self) -> &str;

    /// Entry flags
    fn flags(&self) -> ConFlags;

    /// Check whether every bit of `flag` is set
    fn has_flag(&self, flag: ConFlags) -> bool {
        self.flags().contains(flag)
    }

    /// Returns false for HIDDEN entries
    fn is_listed(&self) -> bool {
        !self.has_flag(ConFlags::HIDDEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_compose() {
        let flags = ConFlags::CHEAT | ConFlags::CACHE;
        assert!(flags.contains(ConFlags::CHEAT));
        assert!(flags.contains(ConFlags::CACHE));
        assert!(!flags.contains(ConFlags::HIDDEN));
        assert!(flags.contains(ConFlags::NONE));
        assert_eq!(ConFlags::default(), ConFlags::NONE);
    }
}
