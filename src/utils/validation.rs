use crate::utils::error::{Result, WarmupError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(WarmupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 寬鬆的信箱格式檢查，真正的投遞驗證交給 provider
pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    use regex::Regex;
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern");

    if re.is_match(email) {
        Ok(())
    } else {
        Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: email.to_string(),
            reason: "Not a valid email address".to_string(),
        })
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| WarmupError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WarmupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("provider.endpoint", "https://api.brevo.com/v3").is_ok());
        assert!(validate_url("provider.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("provider.endpoint", "").is_err());
        assert!(validate_url("provider.endpoint", "invalid-url").is_err());
        assert!(validate_url("provider.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sender.from_email", "artist@label.com").is_ok());
        assert!(validate_email("sender.from_email", "no-at-sign").is_err());
        assert!(validate_email("sender.from_email", "two@@signs.com").is_err());
        assert!(validate_email("sender.from_email", "nodomain@").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("demo_contacts", 5, 1).is_ok());
        assert!(validate_positive_number("demo_contacts", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("sender.from_name", "DJ Nova").is_ok());
        assert!(validate_non_empty_string("sender.from_name", "   ").is_err());
    }
}
