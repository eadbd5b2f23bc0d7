use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SMTP transport error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Email construction error: {0}")]
    EmailBuildError(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl DigestError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            DigestError::MissingConfigError { field } => {
                format!("Setting {} is not set", field)
            }
            DigestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            DigestError::SmtpError(_) | DigestError::EmailBuildError(_) => {
                "Could not send the summary email".to_string()
            }
            DigestError::IoError(_) | DigestError::AddressError(_) => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DigestError::MissingConfigError { .. }
            | DigestError::InvalidConfigValueError { .. }
            | DigestError::AddressError(_) => {
                "Check config.env or the process environment for the listed setting"
            }
            DigestError::SmtpError(_) => "Check the relay host and sender credentials",
            DigestError::EmailBuildError(_) => "Inspect error.log for details",
            DigestError::IoError(_) => "Check that the vault and log paths are writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
