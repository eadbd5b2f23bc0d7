use crate::core::ConfigProvider;
use crate::utils::error::{DigestError, Result};
use crate::utils::validation::Validate;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://api.nytimes.com/svc/books/v3/lists/current/";
pub const DEFAULT_LISTS: &[&str] = &[
    "graphic-books-and-manga",
    "paperback-nonfiction",
    "trade-fiction-paperback",
];
pub const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";
/// Dotenv file read from the working directory before the environment.
pub const CONFIG_ENV_FILE: &str = "config.env";

#[derive(Clone)]
pub struct DigestConfig {
    pub sender_email: String,
    pub sender_password: String,
    pub receiver_email: String,
    pub vault_path: PathBuf,
    pub api_key: String,
    pub api_base_url: String,
    pub lists: Vec<String>,
    pub smtp_relay: String,
    pub log_dir: PathBuf,
    pub verbose: bool,
    pub json_logs: bool,
}

// Credentials stay out of debug output.
impl std::fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestConfig")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"***")
            .field("receiver_email", &self.receiver_email)
            .field("vault_path", &self.vault_path)
            .field("api_key", &"***")
            .field("api_base_url", &self.api_base_url)
            .field("lists", &self.lists)
            .field("smtp_relay", &self.smtp_relay)
            .field("log_dir", &self.log_dir)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl DigestConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DigestError::MissingConfigError {
                    field: key.to_string(),
                })
        };

        let mut api_base_url = lookup("BOOKS_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.ends_with('/') {
            api_base_url.push('/');
        }

        let lists = match lookup("BESTSELLER_LISTS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_LISTS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            sender_email: required("SENDER_EMAIL")?,
            sender_password: required("SENDER_PASSWORD")?,
            receiver_email: required("RECEIVER_EMAIL")?,
            vault_path: PathBuf::from(required("VAULT_PATH")?),
            api_key: required("BOOKS_API_KEY")?,
            api_base_url,
            lists,
            smtp_relay: lookup("SMTP_RELAY")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SMTP_RELAY.to_string()),
            log_dir: lookup("DIGEST_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            verbose: parse_flag(lookup("DIGEST_VERBOSE")),
            json_logs: lookup("DIGEST_LOG_FORMAT")
                .is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

impl ConfigProvider for DigestConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn list_names(&self) -> &[String] {
        &self.lists
    }
}

impl Validate for DigestConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("BOOKS_API_BASE_URL", &self.api_base_url)?;
        validate_non_empty_string("BOOKS_API_KEY", &self.api_key)?;
        validate_list_names("BESTSELLER_LISTS", &self.lists)?;
        validate_email("SENDER_EMAIL", &self.sender_email)?;
        validate_email("RECEIVER_EMAIL", &self.receiver_email)?;
        validate_non_empty_string("SENDER_PASSWORD", &self.sender_password)?;
        validate_non_empty_string("SMTP_RELAY", &self.smtp_relay)?;
        validate_path("VAULT_PATH", &self.vault_path.to_string_lossy())?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
