//! Append-only diagnostic files written alongside console logging.
//!
//! Every call writes and flushes its line before returning, so a line is on disk
//! before the caller moves on to the next step of the run.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ERROR_LOG: &str = "error.log";
pub const OUTPUT_LOG: &str = "output.log";

#[derive(Debug, Clone)]
pub struct RunLog {
    error_path: PathBuf,
    output_path: PathBuf,
}

impl RunLog {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            error_path: dir.join(ERROR_LOG),
            output_path: dir.join(OUTPUT_LOG),
        }
    }

    pub fn error_path(&self) -> &Path {
        &self.error_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn error(&self, line: impl Display) {
        let line = line.to_string();
        tracing::error!("{}", line);
        append_line(&self.error_path, &line);
    }

    pub fn output(&self, line: impl Display) {
        let line = line.to_string();
        tracing::info!("{}", line);
        append_line(&self.output_path, &line);
    }
}

fn append_line(path: &Path, line: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| {
            // Keep each event on one physical line.
            let flat = line.replace('\n', " ");
            writeln!(file, "{}", flat)?;
            file.flush()
        });

    if let Err(e) = result {
        tracing::warn!("Could not write to {}: {}", path.display(), e);
    }
}
