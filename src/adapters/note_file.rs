use crate::core::NoteStore;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// A single Markdown file that only ever grows.
#[derive(Debug, Clone)]
pub struct LocalNoteFile {
    path: PathBuf,
}

impl LocalNoteFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteStore for LocalNoteFile {
    async fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(text.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("Appended {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
