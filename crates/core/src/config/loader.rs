//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the binary's location.

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// File name of the console config
pub const CONFIG_FILE_NAME: &str = "conreg.toml";

/// Returns the directory containing the running executable.
pub fn base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the default config path next to the executable.
///
/// Path: `<exe dir>/conreg.toml`
pub fn default_config_path() -> ConfigResult<PathBuf> {
    Ok(base_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolve a path from a config file against the directory of that file.
///
/// Absolute paths are returned unchanged.
pub fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        let config = Path::new("/srv/game/conreg.toml");

        assert_eq!(
            resolve_relative(config, Path::new("convars.json")),
            PathBuf::from("/srv/game/convars.json")
        );
        assert_eq!(
            resolve_relative(config, Path::new("/var/cache/convars.json")),
            PathBuf::from("/var/cache/convars.json")
        );
    }

    #[test]
    fn test_default_config_path_file_name() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with(CONFIG_FILE_NAME));
    }
}
