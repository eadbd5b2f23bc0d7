use crate::utils::error::{DigestError, Result};
use lettre::message::Mailbox;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DigestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Accepts a bare address or a `Name <user@domain>` mailbox, as the mail builder does.
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if let Err(e) = value.parse::<Mailbox>() {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Not a valid email address: {}", e),
        });
    }
    Ok(())
}

pub fn validate_list_names(field_name: &str, lists: &[String]) -> Result<()> {
    if lists.is_empty() {
        return Err(DigestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one list name is required".to_string(),
        });
    }

    for list in lists {
        if list.is_empty() || list.contains(['/', '?', '#', ' ']) {
            return Err(DigestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: list.clone(),
                reason: "List names must be non-empty URL path segments".to_string(),
            });
        }
    }

    Ok(())
}
