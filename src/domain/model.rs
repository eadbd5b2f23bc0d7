use serde::{Deserialize, Serialize};

/// One book as it appeared on one list, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub list_name: String,
    pub published_date: String,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        list_name: impl Into<String>,
        published_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            list_name: list_name.into(),
            published_date: published_date.into(),
        }
    }
}

/// Records sharing a list name, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroup {
    pub list_name: String,
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedOutput {
    /// Markdown rendering, appended to the vault.
    pub plain_text: String,
    /// HTML rendering, used as the email body.
    pub rich_text: String,
}

/// Result of fetching a single list.
#[derive(Debug)]
pub enum ListFetchOutcome {
    Fetched {
        list: String,
        records: Vec<BookRecord>,
    },
    /// The response arrived but did not carry `results.books`.
    Skipped { list: String, reason: String },
    /// The request itself failed. Aborts the whole collection.
    TransportFailed { list: String, error: String },
}

/// What the load step managed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub note_appended: bool,
    /// Relay response for the sent message, if sending succeeded.
    pub email_receipt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    NothingFound,
    Completed {
        records: usize,
        lists: usize,
        report: LoadReport,
    },
}

/// Email handed to a [`Notifier`](crate::domain::ports::Notifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEmail {
    pub subject: String,
    pub html_body: String,
}
