pub mod etl;
pub mod fetcher;
pub mod formatter;
pub mod pipeline;

pub use crate::domain::model::{BookRecord, FormattedOutput, ListGroup};
pub use crate::domain::ports::{ConfigProvider, NoteStore, Notifier, Pipeline};
pub use crate::utils::error::Result;
