pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{LocalNoteFile, SmtpNotifier};
pub use config::DigestConfig;
pub use core::{etl::DigestEngine, pipeline::BestsellerPipeline};
pub use domain::model::{BookRecord, FormattedOutput, LoadReport, RunSummary};
pub use utils::error::{DigestError, Result};
