//! API utility functions
//!
//! Input validation and query-parameter parsing shared by the handlers.

use crate::error::AppError;

/// Maximum user message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Validate a user message and return it unchanged
///
/// # Returns
/// * `Ok(String)` - the message, verbatim
/// * `Err(AppError::Validation)` - missing, blank or too long
pub fn validate_user_message(message: Option<String>) -> Result<String, AppError> {
    let message =
        message.ok_or_else(|| AppError::Validation("userMessage is required".to_string()))?;
    if message.trim().is_empty() {
        return Err(AppError::Validation(
            "userMessage cannot be empty".to_string(),
        ));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation(format!(
            "userMessage exceeds maximum length of {} characters",
            MAX_MESSAGE_LENGTH
        )));
    }
    Ok(message)
}

/// Raw query string as key/value pairs, in order
///
/// Extracting pairs instead of a struct means repeated or unknown keys never
/// reject the request.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`, if any
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Parse a positive integer query parameter leniently
///
/// Reads the leading integer of the value (`"3abc"` is 3). A missing,
/// non-numeric or zero value yields `default`; the result is never below 1.
pub fn parse_positive_or(raw: Option<&str>, default: i64) -> i64 {
    let parsed = raw.and_then(leading_integer).filter(|n| *n != 0);
    parsed.unwrap_or(default).max(1)
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long inputs instead of failing
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_message() {
        assert_eq!(
            validate_user_message(Some("Plan my day".to_string())).unwrap(),
            "Plan my day"
        );
        assert!(matches!(
            validate_user_message(None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_user_message(Some("   \n".to_string())),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_user_message(Some("x".repeat(MAX_MESSAGE_LENGTH + 1))),
            Err(AppError::Validation(_))
        ));
        assert!(validate_user_message(Some("x".repeat(MAX_MESSAGE_LENGTH))).is_ok());
    }

    #[test]
    fn test_message_is_not_trimmed() {
        assert_eq!(
            validate_user_message(Some("  hi  ".to_string())).unwrap(),
            "  hi  "
        );
    }

    #[test]
    fn test_first_value_takes_first_occurrence() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("limit".to_string(), "5".to_string()),
            ("page".to_string(), "9".to_string()),
        ];
        assert_eq!(first_value(&pairs, "page").as_deref(), Some("2"));
        assert_eq!(first_value(&pairs, "limit").as_deref(), Some("5"));
        assert_eq!(first_value(&pairs, "nocache"), None);
    }

    #[test]
    fn test_parse_positive_or() {
        assert_eq!(parse_positive_or(None, 10), 10);
        assert_eq!(parse_positive_or(Some(""), 10), 10);
        assert_eq!(parse_positive_or(Some("abc"), 10), 10);
        assert_eq!(parse_positive_or(Some("0"), 10), 10);
        assert_eq!(parse_positive_or(Some("3"), 10), 3);
        assert_eq!(parse_positive_or(Some("3abc"), 10), 3);
        assert_eq!(parse_positive_or(Some(" 7"), 10), 7);
        assert_eq!(parse_positive_or(Some("+4"), 10), 4);
        assert_eq!(parse_positive_or(Some("-5"), 10), 1);
        assert_eq!(parse_positive_or(Some("2.9"), 10), 2);
    }
}
