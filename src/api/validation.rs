//! Typed parsing of raw form input. Every malformed value becomes an explicit
//! validation failure instead of an unhandled parse error.

use chrono::NaiveDate;

use super::ApiError;

pub fn parse_age(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid age: '{}'. Age must be an integer", raw)))
}

pub fn parse_badge(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse().map_err(|_| {
        ApiError::validation(format!(
            "Invalid badge number: '{}'. Badge must be an integer",
            raw
        ))
    })
}

pub fn parse_security_code(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse().map_err(|_| {
        ApiError::validation(format!(
            "Invalid security level: '{}'. Security level must be an integer",
            raw
        ))
    })
}

/// Parses an optional `YYYY-MM-DD` form value. Absent or empty input yields
/// `None`; a present but unparseable string is a validation failure, never a
/// silent default.
pub fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::validation(format!(
                    "Invalid date for {}: '{}'. Expected YYYY-MM-DD",
                    field, value
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("34").unwrap(), 34);
        assert_eq!(parse_age(" 34 ").unwrap(), 34);
        assert!(parse_age("thirty").is_err());
        assert!(parse_age("").is_err());
        assert!(parse_age("3.5").is_err());
    }

    #[test]
    fn test_parse_badge() {
        assert_eq!(parse_badge("1042").unwrap(), 1042);
        assert!(parse_badge("abc").is_err());
    }

    #[test]
    fn test_parse_security_code() {
        assert_eq!(parse_security_code("5").unwrap(), 5);
        assert_eq!(parse_security_code("9").unwrap(), 9);
        assert!(parse_security_code("high").is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None, "Apprehended").unwrap(), None);
        assert_eq!(parse_optional_date(Some(""), "Apprehended").unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-03-15"), "Apprehended").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert!(parse_optional_date(Some("15/03/2024"), "Apprehended").is_err());
        assert!(parse_optional_date(Some("not-a-date"), "Apprehended").is_err());
    }
}
