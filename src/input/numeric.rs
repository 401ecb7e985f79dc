//! Numeric token recognition
//!
//! Input files mix C-style and Fortran-style literals (`1.0e13`, `3.4D-5`,
//! `2.5f`). A token is numeric when it matches
//!
//! ```text
//! [+-]? digits? ('.' digits?)? ( [eEdDfF] [+-]? digits? )?
//! ```
//!
//! with at least one digit before the exponent marker. Anything else (a
//! second decimal point, a second marker, a stray letter) rejects the token.

/// Characters accepted as exponent or precision markers
const EXPONENT_MARKERS: [char; 6] = ['e', 'E', 'd', 'D', 'f', 'F'];

/// Return `true` if `token` is a numeric literal
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::numeric::is_number;
///
/// assert!(is_number("-1.23e+45"));
/// assert!(is_number("3.4D-5"));
/// assert!(!is_number("1.2.3"));
/// assert!(!is_number("12a"));
/// ```
pub fn is_number(token: &str) -> bool {
    let mut digits_seen = false;
    let mut dot_seen = false;
    let mut marker_at: Option<usize> = None;
    let mut exponent_sign_seen = false;

    for (i, c) in token.char_indices() {
        match c {
            '+' | '-' => {
                if i == 0 {
                    continue;
                }
                // Only directly after the marker, and only once
                match marker_at {
                    Some(m) if i == m + 1 && !exponent_sign_seen => exponent_sign_seen = true,
                    _ => return false,
                }
            }
            '.' => {
                if dot_seen || marker_at.is_some() {
                    return false;
                }
                dot_seen = true;
            }
            c if EXPONENT_MARKERS.contains(&c) => {
                if marker_at.is_some() || !digits_seen {
                    return false;
                }
                marker_at = Some(i);
            }
            c if c.is_ascii_digit() => {
                digits_seen = true;
            }
            _ => return false,
        }
    }

    digits_seen
}

/// Parse a numeric literal into `f64`
///
/// Returns `None` when [`is_number`] rejects the token. Fortran markers
/// (`d`, `D`) and precision suffixes (`f`, `F`) are read as a decimal
/// exponent; a marker without exponent digits is ignored.
///
/// # Example
///
/// ```rust
/// use kmc_rs::input::numeric::parse_number;
///
/// assert_eq!(parse_number("3.4D-5"), Some(3.4e-5));
/// assert_eq!(parse_number("2.0f"), Some(2.0));
/// assert_eq!(parse_number("abc"), None);
/// ```
pub fn parse_number(token: &str) -> Option<f64> {
    if !is_number(token) {
        return None;
    }

    let normalized: String = token
        .chars()
        .map(|c| if EXPONENT_MARKERS.contains(&c) { 'e' } else { c })
        .collect();

    // "2.0e", "2.0e+" carry no exponent
    let trimmed = normalized.trim_end_matches(['+', '-']).trim_end_matches('e');

    trimmed.parse::<f64>().ok()
}

/// Parse an integer field
///
/// Accepts any numeric literal whose value is integral (`20`, `2.0e1`), so
/// that dimension fields written in scientific notation are not rejected.
pub fn parse_integer(token: &str) -> Option<i64> {
    let value = parse_number(token)?;

    if value.fract() != 0.0 || !value.is_finite() {
        return None;
    }

    Some(value as i64)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_signed_scientific_notation() {
        assert!(is_number("-1.23e+45"));
        assert!(is_number("+7"));
        assert!(is_number("1.0E13"));
        assert!(is_number("71128"));
    }

    #[test]
    fn test_accepts_fortran_markers() {
        assert!(is_number("3.4D-5"));
        assert!(is_number("1.5d2"));
        assert!(is_number("2.5f"));
        assert!(is_number("2.5F"));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(!is_number("1.2.3"));
        assert!(!is_number("12a"));
        assert!(!is_number(""));
        assert!(!is_number("-"));
        assert!(!is_number("."));
        assert!(!is_number("e5"));
        assert!(!is_number("1e5e3"));
        assert!(!is_number("1e5.0"));
        assert!(!is_number("1-2"));
        assert!(!is_number("1e+-2"));
        assert!(!is_number("*"));
        assert!(!is_number("A"));
    }

    #[test]
    fn test_parse_number_values() {
        assert_eq!(parse_number("-1.23e+45"), Some(-1.23e45));
        assert_eq!(parse_number("3.4D-5"), Some(3.4e-5));
        assert_eq!(parse_number("1.0e13"), Some(1.0e13));
        assert_eq!(parse_number("71128"), Some(71128.0));
        assert_eq!(parse_number("4."), Some(4.0));
        assert_eq!(parse_number("2e"), Some(2.0));
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("20"), Some(20));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer("2.0e1"), Some(20));
        assert_eq!(parse_integer("2.5"), None);
        assert_eq!(parse_integer("x"), None);
    }
}
