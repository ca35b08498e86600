use crate::utils::error::{CepError, Result};
use std::time::Duration;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CepError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_max_duration(field_name: &str, value: Duration, max: Duration) -> Result<()> {
    if value > max {
        return Err(CepError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}ms", value.as_millis()),
            reason: format!("Value must be at most {}ms", max.as_millis()),
        });
    }
    Ok(())
}

/// 將 CEP 正規化為 8 位數字。接受 `06233030` 與 `06233-030` 兩種寫法。
pub fn normalize_cep(field_name: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| CepError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let digits: String = match trimmed.split_once('-') {
        Some((head, tail)) => {
            if head.len() != 5 || tail.len() != 3 {
                return Err(invalid("Hyphenated CEP must look like NNNNN-NNN"));
            }
            format!("{}{}", head, tail)
        }
        None => trimmed.to_string(),
    };

    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("CEP must contain exactly 8 digits"));
    }

    Ok(digits)
}
