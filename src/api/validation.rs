use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

pub const SHARE_CATEGORIES: [&str; 5] = ["cinema", "music", "games", "books", "travel"];

pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_CAPTION_LENGTH: usize = 500;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"))
}

/// Normalizes raw limit/offset query values. A non-numeric value in either
/// position resets both to their defaults; otherwise the limit is clamped to
/// 1..=100 and negative offsets become zero.
pub fn pagination(limit: Option<&str>, offset: Option<&str>) -> (u64, u64) {
    let parsed_limit = match limit {
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => return (DEFAULT_LIMIT, 0),
        },
        None => None,
    };
    let parsed_offset = match offset {
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => return (DEFAULT_LIMIT, 0),
        },
        None => None,
    };

    #[allow(clippy::cast_sign_loss)]
    let limit = parsed_limit
        .unwrap_or(DEFAULT_LIMIT as i64)
        .clamp(1, MAX_LIMIT as i64) as u64;
    #[allow(clippy::cast_sign_loss)]
    let offset = parsed_offset.unwrap_or(0).max(0) as u64;

    (limit, offset)
}

/// Non-numeric years are silently ignored rather than rejected.
pub fn optional_year(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|value| value.parse().ok())
}

pub fn valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn valid_hex_color(color: &str) -> bool {
    hex_color_regex().is_match(color)
}

pub fn valid_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 20 {
        return Err("Username must be between 3 and 20 characters");
    }
    Ok(())
}

pub fn valid_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one number");
    }
    Ok(())
}

pub fn valid_category(category: &str) -> bool {
    SHARE_CATEGORIES.contains(&category)
}

/// "cinema" -> "Cinema", used for default share titles.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(pagination(None, None), (20, 0));
    }

    #[test]
    fn pagination_clamps_limit_and_offset() {
        assert_eq!(pagination(Some("500"), Some("10")), (100, 10));
        assert_eq!(pagination(Some("0"), None), (1, 0));
        assert_eq!(pagination(Some("-3"), Some("-5")), (1, 0));
    }

    #[test]
    fn pagination_resets_both_on_garbage() {
        assert_eq!(pagination(Some("abc"), Some("40")), (20, 0));
        assert_eq!(pagination(Some("50"), Some("xyz")), (20, 0));
    }

    #[test]
    fn year_parsing_is_lenient() {
        assert_eq!(optional_year(Some("2019")), Some(2019));
        assert_eq!(optional_year(Some("not-a-year")), None);
        assert_eq!(optional_year(None), None);
    }

    #[test]
    fn email_format() {
        assert!(valid_email("ada@example.com"));
        assert!(valid_email("a.b+c@sub.domain.org"));
        assert!(!valid_email("no-at-sign.com"));
        assert!(!valid_email("spaces in@example.com"));
        assert!(!valid_email("missing@tld"));
    }

    #[test]
    fn hex_colors() {
        assert!(valid_hex_color("#AABBCC"));
        assert!(valid_hex_color("#0a1b2c"));
        assert!(!valid_hex_color("AABBCC"));
        assert!(!valid_hex_color("#ZZZZZZ"));
        assert!(!valid_hex_color("#AABBCCDD"));
    }

    #[test]
    fn username_bounds() {
        assert!(valid_username("ada").is_ok());
        assert!(valid_username("ab").is_err());
        assert!(valid_username(&"x".repeat(21)).is_err());
    }

    #[test]
    fn password_strength() {
        assert!(valid_password("Sup3rSecret").is_ok());
        assert_eq!(
            valid_password("short"),
            Err("Password must be at least 8 characters long")
        );
        assert_eq!(
            valid_password("alllowercase1"),
            Err("Password must contain at least one uppercase letter")
        );
        assert_eq!(
            valid_password("ALLUPPERCASE1"),
            Err("Password must contain at least one lowercase letter")
        );
        assert_eq!(
            valid_password("NoDigitsHere"),
            Err("Password must contain at least one number")
        );
    }

    #[test]
    fn category_membership() {
        assert!(valid_category("cinema"));
        assert!(valid_category("travel"));
        assert!(!valid_category("podcasts"));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("cinema"), "Cinema");
        assert_eq!(capitalize(""), "");
    }
}
