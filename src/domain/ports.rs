use crate::domain::model::{BookRecord, DigestEmail, FormattedOutput, LoadReport};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Append-only destination for the Markdown digest.
pub trait NoteStore: Send + Sync {
    fn append(&self, text: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location, used in log lines.
    fn location(&self) -> String;
}

/// Delivers the HTML digest. Returns the relay's receipt on success.
pub trait Notifier: Send + Sync {
    fn send(
        &self,
        email: &DigestEmail,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn list_names(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BookRecord>>;
    async fn transform(&self, data: Vec<BookRecord>) -> Result<FormattedOutput>;
    async fn load(&self, output: FormattedOutput) -> Result<LoadReport>;
}
