//! ConVar value storage and coercion
//!
//! A variable's type is fixed by its default value. Writes of any other
//! kind are coerced into that type, never rejected:
//!
//! | input   | BOOLEAN        | INTEGER        | DOUBLE         | STRING       |
//! |---------|----------------|----------------|----------------|--------------|
//! | text    | int parse / len| int parse / len| float parse/len| verbatim     |
//! | number  | nonzero → 0/1  | truncated      | as double      | number text  |
//!
//! "len" is the byte length of the text, used when it does not start with
//! a number. A BOOLEAN written from text keeps the parsed integer, so
//! `"5"` reads back as 5 and any nonzero value is true. Reads go the other
//! way: asking a STRING variable for a number yields the length of its
//! text.

use std::fmt;

/// The type of a ConVar, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConVarType {
    Boolean,
    Integer,
    Double,
    String,
}

impl ConVarType {
    /// Lowercase type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ConVarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ConVar value
///
/// Used both as stored value and as write input. Conversions from the
/// usual scalar types are provided, so `set_value(5)`, `set_value(2.5)`,
/// `set_value(true)` and `set_value("text")` all work.
#[derive(Debug, Clone, PartialEq)]
pub enum ConVarValue {
    /// Boolean, nonzero is true
    Bool(i64),
    Int(i64),
    Double(f64),
    Text(String),
}

impl ConVarValue {
    /// The ConVar type this value belongs to
    pub fn var_type(&self) -> ConVarType {
        match self {
            Self::Bool(_) => ConVarType::Boolean,
            Self::Int(_) => ConVarType::Integer,
            Self::Double(_) => ConVarType::Double,
            Self::Text(_) => ConVarType::String,
        }
    }

    /// Canonical string encoding
    ///
    /// Booleans print their integer, doubles use six fixed decimals.
    pub fn to_canonical_string(&self) -> String {
        match self {
            Self::Bool(i) | Self::Int(i) => i.to_string(),
            Self::Double(d) => format_double(*d),
            Self::Text(s) => s.clone(),
        }
    }

    /// Coerce this value into `target`
    pub fn coerce_into(self, target: ConVarType) -> ConVarValue {
        match self {
            Self::Text(text) => match target {
                ConVarType::Boolean => {
                    Self::Bool(parse_int_prefix(&text).unwrap_or(text.len() as i64))
                }
                ConVarType::Integer => Self::Int(parse_int_prefix(&text).unwrap_or(text.len() as i64)),
                ConVarType::Double => {
                    Self::Double(parse_double_prefix(&text).unwrap_or(text.len() as f64))
                }
                ConVarType::String => Self::Text(text),
            },
            number => {
                let n = Numeric::of(&number);
                match target {
                    ConVarType::Boolean => Self::Bool(i64::from(n.is_truthy())),
                    ConVarType::Integer => Self::Int(n.as_i64()),
                    ConVarType::Double => Self::Double(n.as_f64()),
                    ConVarType::String => Self::Text(number.to_canonical_string()),
                }
            }
        }
    }
}

impl fmt::Display for ConVarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<bool> for ConVarValue {
    fn from(value: bool) -> Self {
        Self::Bool(i64::from(value))
    }
}

impl From<i32> for ConVarValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ConVarValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ConVarValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f32> for ConVarValue {
    fn from(value: f32) -> Self {
        Self::Double(value.into())
    }
}

impl From<f64> for ConVarValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for ConVarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConVarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ConVarValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

/// Numeric view of a stored value
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i64),
    Double(f64),
}

impl Numeric {
    fn of(value: &ConVarValue) -> Self {
        match value {
            ConVarValue::Bool(i) | ConVarValue::Int(i) => Self::Int(*i),
            ConVarValue::Double(d) => Self::Double(*d),
            // Text reads as its length
            ConVarValue::Text(s) => Self::Int(s.len() as i64),
        }
    }

    fn is_truthy(self) -> bool {
        match self {
            Self::Int(i) => i != 0,
            Self::Double(d) => d != 0.0,
        }
    }

    fn as_i64(self) -> i64 {
        match self {
            Self::Int(i) => i,
            Self::Double(d) => d as i64,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Double(d) => d,
        }
    }
}

/// Types a ConVar can be read as
pub trait FromConVar: Sized {
    /// Convert a stored value into this type
    fn from_convar(value: &ConVarValue) -> Self;
}

impl FromConVar for String {
    fn from_convar(value: &ConVarValue) -> Self {
        value.to_canonical_string()
    }
}

impl FromConVar for bool {
    fn from_convar(value: &ConVarValue) -> Self {
        Numeric::of(value).is_truthy()
    }
}

impl FromConVar for i32 {
    fn from_convar(value: &ConVarValue) -> Self {
        match Numeric::of(value) {
            Numeric::Int(i) => i as i32,
            Numeric::Double(d) => d as i32,
        }
    }
}

impl FromConVar for i64 {
    fn from_convar(value: &ConVarValue) -> Self {
        Numeric::of(value).as_i64()
    }
}

impl FromConVar for f32 {
    fn from_convar(value: &ConVarValue) -> Self {
        Numeric::of(value).as_f64() as f32
    }
}

impl FromConVar for f64 {
    fn from_convar(value: &ConVarValue) -> Self {
        Numeric::of(value).as_f64()
    }
}

impl FromConVar for ConVarValue {
    fn from_convar(value: &ConVarValue) -> Self {
        value.clone()
    }
}

/// Format a double with six fixed decimals
fn format_double(d: f64) -> String {
    if d.is_nan() {
        if d.is_sign_negative() { "-nan" } else { "nan" }.to_string()
    } else {
        format!("{:.6}", d)
    }
}

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\x0b', '\x0c', '\r'];

/// Parse a leading decimal integer, ignoring anything after it
///
/// Leading whitespace and a sign are accepted. Returns `None` if no digit
/// follows. Values outside the `i64` range saturate.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(WHITESPACE);
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in rest[..digits].bytes() {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    Some(value)
}

/// Parse a leading decimal floating point number, ignoring anything after it
///
/// Accepts leading whitespace, a sign, `inf`/`infinity`/`nan` in any case,
/// `digits[.digits][e[sign]digits]` and hexadecimal
/// `0x hexdigits[.hexdigits][p[sign]digits]`. Returns `None` if no number
/// starts the text.
pub fn parse_double_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start_matches(WHITESPACE);
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let negative = bytes.first() == Some(&b'-');

    let word = text[end..].to_ascii_lowercase();
    if word.starts_with("inf") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    if word.starts_with("nan") {
        return Some(if negative { -f64::NAN } else { f64::NAN });
    }

    if let Some(hex) = parse_hex_prefix(&text[end..]) {
        return Some(if negative { -hex } else { hex });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Unsigned hexadecimal float after an optional sign, `None` if not hex
fn parse_hex_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' || !matches!(bytes[1], b'x' | b'X') {
        return None;
    }

    let mut end = 2;
    let mut mantissa = 0.0_f64;
    let mut int_digits = 0;
    while let Some(digit) = bytes.get(end).and_then(|b| (*b as char).to_digit(16)) {
        mantissa = mantissa * 16.0 + f64::from(digit);
        int_digits += 1;
        end += 1;
    }

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        let mut pos = end + 1;
        while let Some(digit) = bytes.get(pos).and_then(|b| (*b as char).to_digit(16)) {
            mantissa = mantissa * 16.0 + f64::from(digit);
            frac_digits += 1;
            pos += 1;
        }
        if int_digits > 0 || frac_digits > 0 {
            end = pos;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        // Just "0" followed by an x
        return Some(0.0);
    }

    let mut exponent: i32 = -4 * frac_digits;
    if matches!(bytes.get(end), Some(b'p' | b'P')) {
        let rest = &text[end + 1..];
        let signless = rest.strip_prefix(['+', '-']).unwrap_or(rest);
        let leads_with_digit = signless.starts_with(|c: char| c.is_ascii_digit());
        if let Some(exp) = parse_int_prefix(rest).filter(|_| leads_with_digit) {
            let exp = exp.clamp(i64::from(i32::MIN / 2), i64::from(i32::MAX / 2)) as i32;
            exponent = exponent.saturating_add(exp);
        }
    }

    Some(mantissa * 2f64.powi(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(ConVarValue::from(true).to_canonical_string(), "1");
        assert_eq!(ConVarValue::from(false).to_canonical_string(), "0");
        assert_eq!(ConVarValue::Int(-42).to_canonical_string(), "-42");
        assert_eq!(ConVarValue::Double(2.5).to_canonical_string(), "2.500000");
        assert_eq!(ConVarValue::Double(0.1234567).to_canonical_string(), "0.123457");
        assert_eq!(ConVarValue::Text("hi".into()).to_canonical_string(), "hi");
    }

    #[test]
    fn test_int_prefix_parsing() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  -7"), Some(-7));
        assert_eq!(parse_int_prefix("+3"), Some(3));
        assert_eq!(parse_int_prefix("12abc"), Some(12));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_double_prefix_parsing() {
        assert_eq!(parse_double_prefix("2.5"), Some(2.5));
        assert_eq!(parse_double_prefix(" -0.5x"), Some(-0.5));
        assert_eq!(parse_double_prefix(".5"), Some(0.5));
        assert_eq!(parse_double_prefix("5."), Some(5.0));
        assert_eq!(parse_double_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_double_prefix("1e"), Some(1.0));
        assert_eq!(parse_double_prefix("2E-1"), Some(0.2));
        assert_eq!(parse_double_prefix("INF"), Some(f64::INFINITY));
        assert_eq!(parse_double_prefix("-infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_double_prefix("nan").unwrap().is_nan());
        assert_eq!(parse_double_prefix("."), None);
        assert_eq!(parse_double_prefix("abc"), None);
        assert_eq!(parse_double_prefix("-"), None);
    }

    #[test]
    fn test_double_prefix_hex() {
        assert_eq!(parse_double_prefix("0x1A"), Some(26.0));
        assert_eq!(parse_double_prefix("-0x10zz"), Some(-16.0));
        assert_eq!(parse_double_prefix("0x1.8"), Some(1.5));
        assert_eq!(parse_double_prefix("0x1p4"), Some(16.0));
        assert_eq!(parse_double_prefix("0x.8p-1"), Some(0.25));
        assert_eq!(parse_double_prefix("0xg"), Some(0.0));

        let sensitivity = ConVarValue::from("0x1A").coerce_into(ConVarType::Double);
        assert_eq!(sensitivity, ConVarValue::Double(26.0));
    }

    #[test]
    fn test_text_into_numeric_falls_back_to_length() {
        let int = ConVarValue::from("abc").coerce_into(ConVarType::Integer);
        assert_eq!(int, ConVarValue::Int(3));

        let int = ConVarValue::from("42").coerce_into(ConVarType::Integer);
        assert_eq!(int, ConVarValue::Int(42));

        let double = ConVarValue::from("hello").coerce_into(ConVarType::Double);
        assert_eq!(double, ConVarValue::Double(5.0));

        let boolean = ConVarValue::from("").coerce_into(ConVarType::Boolean);
        assert_eq!(boolean, ConVarValue::Bool(0));

        let boolean = ConVarValue::from("yes").coerce_into(ConVarType::Boolean);
        assert_eq!(boolean, ConVarValue::Bool(3));
    }

    #[test]
    fn test_boolean_keeps_parsed_integer() {
        let five = ConVarValue::from("5").coerce_into(ConVarType::Boolean);
        assert_eq!(five, ConVarValue::Bool(5));
        assert_eq!(five.to_canonical_string(), "5");
        assert_eq!(i32::from_convar(&five), 5);
        assert!(bool::from_convar(&five));

        let abc = ConVarValue::from("abc").coerce_into(ConVarType::Boolean);
        assert_eq!(abc.to_canonical_string(), "3");
        assert_eq!(i64::from_convar(&abc), 3);

        let zero = ConVarValue::from("0").coerce_into(ConVarType::Boolean);
        assert!(!bool::from_convar(&zero));

        // Numbers still collapse to 0/1
        let seven = ConVarValue::from(7).coerce_into(ConVarType::Boolean);
        assert_eq!(seven, ConVarValue::Bool(1));
    }

    #[test]
    fn test_number_into_string_is_not_length() {
        // Asymmetric with the text → number path on purpose
        let text = ConVarValue::from(5).coerce_into(ConVarType::String);
        assert_eq!(text, ConVarValue::Text("5".into()));

        let text = ConVarValue::from(2.5).coerce_into(ConVarType::String);
        assert_eq!(text, ConVarValue::Text("2.500000".into()));

        let text = ConVarValue::from(true).coerce_into(ConVarType::String);
        assert_eq!(text, ConVarValue::Text("1".into()));
    }

    #[test]
    fn test_numeric_coercions() {
        assert_eq!(ConVarValue::from(3.9).coerce_into(ConVarType::Integer), ConVarValue::Int(3));
        assert_eq!(ConVarValue::from(-3.9).coerce_into(ConVarType::Integer), ConVarValue::Int(-3));
        assert_eq!(ConVarValue::from(7).coerce_into(ConVarType::Double), ConVarValue::Double(7.0));
        assert_eq!(ConVarValue::from(0.1).coerce_into(ConVarType::Boolean), ConVarValue::Bool(1));
        assert_eq!(ConVarValue::from(0).coerce_into(ConVarType::Boolean), ConVarValue::Bool(0));
        assert_eq!(ConVarValue::from(true).coerce_into(ConVarType::Integer), ConVarValue::Int(1));
    }

    #[test]
    fn test_reads() {
        let text = ConVarValue::from("four");
        assert_eq!(i32::from_convar(&text), 4);
        assert_eq!(f64::from_convar(&text), 4.0);
        assert!(bool::from_convar(&text));
        assert_eq!(String::from_convar(&text), "four");

        let double = ConVarValue::from(2.75);
        assert_eq!(i32::from_convar(&double), 2);
        assert_eq!(String::from_convar(&double), "2.750000");

        let boolean = ConVarValue::from(true);
        assert_eq!(i64::from_convar(&boolean), 1);
        assert_eq!(f32::from_convar(&boolean), 1.0);
    }
}
