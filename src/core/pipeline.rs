use crate::core::fetcher::{Collection, ListFetcher};
use crate::core::formatter;
use crate::core::{BookRecord, ConfigProvider, FormattedOutput, NoteStore, Notifier, Pipeline};
use crate::domain::model::{DigestEmail, ListFetchOutcome, LoadReport};
use crate::utils::error::Result;
use crate::utils::run_log::RunLog;
use reqwest::Client;

pub const NOTE_HEADER_PREFIX: &str = "# NEW READING COLLECTION - MONTH OF ";
pub const EMAIL_SUBJECT_PREFIX: &str = "NYT Bestsellers Appended - Month of ";

pub fn note_header(month: &str) -> String {
    format!("{}{}", NOTE_HEADER_PREFIX, month)
}

pub fn email_subject(month: &str) -> String {
    format!("{}{}", EMAIL_SUBJECT_PREFIX, month)
}

/// Full English name of the current local month, e.g. "October".
pub fn current_month_name() -> String {
    chrono::Local::now().format("%B").to_string()
}

pub struct BestsellerPipeline<S: NoteStore, N: Notifier, C: ConfigProvider> {
    pub(crate) store: S,
    pub(crate) notifier: N,
    pub(crate) config: C,
    pub(crate) fetcher: ListFetcher,
    pub(crate) run_log: RunLog,
    pub(crate) month: String,
}

impl<S: NoteStore, N: Notifier, C: ConfigProvider> BestsellerPipeline<S, N, C> {
    pub fn new(store: S, notifier: N, config: C, run_log: RunLog) -> Self {
        let fetcher = ListFetcher::new(Client::new(), config.api_base_url(), config.api_key());
        Self {
            store,
            notifier,
            config,
            fetcher,
            run_log,
            month: current_month_name(),
        }
    }

    /// Pins the month used in the note header and email subject.
    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    async fn append_note(&self, plain_text: &str) -> bool {
        tracing::info!("Adding to vault...");
        let entry = format!("{}\n\n{}", note_header(&self.month), plain_text);

        match self.store.append(&entry).await {
            Ok(()) => {
                self.run_log.output("Appended to vault.");
                true
            }
            Err(e) => {
                self.run_log
                    .error(format!("vault error: {} ({})", e, self.store.location()));
                false
            }
        }
    }

    async fn send_email(&self, rich_text: String) -> Option<String> {
        tracing::info!("Sending email...");
        let email = DigestEmail {
            subject: email_subject(&self.month),
            html_body: rich_text,
        };

        match self.notifier.send(&email).await {
            Ok(receipt) => {
                self.run_log.output(format!("Email sent: {}", receipt));
                Some(receipt)
            }
            Err(e) => {
                self.run_log.error(format!("Email error: {}", e));
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: NoteStore, N: Notifier, C: ConfigProvider> Pipeline for BestsellerPipeline<S, N, C> {
    async fn extract(&self) -> Result<Vec<BookRecord>> {
        tracing::info!("Getting best sellers...");
        let mut collection = Collection::new();

        for list in self.config.list_names() {
            let outcome = self.fetcher.fetch_list(list).await;
            match &outcome {
                ListFetchOutcome::Fetched { records, .. } if !records.is_empty() => {
                    tracing::info!("Added new list: {}", list);
                }
                ListFetchOutcome::Fetched { .. } => {
                    tracing::info!("List {} returned no books", list);
                }
                ListFetchOutcome::Skipped { reason, .. } => {
                    self.run_log
                        .error(format!("API response error ({}): {}", list, reason));
                }
                ListFetchOutcome::TransportFailed { error, .. } => {
                    self.run_log.error(format!("fetch error ({}): {}", list, error));
                }
            }
            if collection.absorb(outcome).is_break() {
                return Ok(Vec::new());
            }
        }

        let records = collection.into_records();
        tracing::info!("Best sellers collected: {} books", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<BookRecord>) -> Result<FormattedOutput> {
        tracing::info!("Formatting books...");
        let output = formatter::format_books(data);
        tracing::info!("Formatted books");
        Ok(output)
    }

    async fn load(&self, output: FormattedOutput) -> Result<LoadReport> {
        // Each sink's failure is logged inside its own step and never stops the other.
        let note_appended = self.append_note(&output.plain_text).await;
        let email_receipt = self.send_email(output.rich_text).await;

        Ok(LoadReport {
            note_appended,
            email_receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DigestError;
    use httpmock::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        entries: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        async fn entries(&self) -> Vec<String> {
            self.entries.lock().await.clone()
        }
    }

    impl NoteStore for MockStore {
        async fn append(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(DigestError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only vault",
                )));
            }
            self.entries.lock().await.push(text.to_string());
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    #[derive(Clone, Default)]
    struct MockNotifier {
        sent: Arc<Mutex<Vec<DigestEmail>>>,
        fail: bool,
    }

    impl MockNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl Notifier for MockNotifier {
        async fn send(&self, email: &DigestEmail) -> Result<String> {
            if self.fail {
                return Err(DigestError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "relay refused connection",
                )));
            }
            self.sent.lock().await.push(email.clone());
            Ok("250 2.0.0 OK queued".to_string())
        }
    }

    struct MockConfig {
        api_base_url: String,
        lists: Vec<String>,
    }

    impl MockConfig {
        fn new(api_base_url: String, lists: &[&str]) -> Self {
            Self {
                api_base_url,
                lists: lists.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn api_base_url(&self) -> &str {
            &self.api_base_url
        }

        fn api_key(&self) -> &str {
            "test-key"
        }

        fn list_names(&self) -> &[String] {
            &self.lists
        }
    }

    fn list_body(name: &str, titles: &[&str]) -> serde_json::Value {
        let books: Vec<serde_json::Value> = titles
            .iter()
            .map(|t| serde_json::json!({"title": t, "author": format!("{} Author", t)}))
            .collect();
        serde_json::json!({
            "status": "OK",
            "results": {"list_name": name, "published_date": "2024-01-07", "books": books}
        })
    }

    fn read(path: &std::path::Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_extract_concatenates_lists_in_config_order() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/current/l1.json")
                .query_param("api-key", "test-key");
            then.status(200).json_body(list_body("List One", &["A", "B"]));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/current/l2.json");
            then.status(200).json_body(list_body("List Two", &["C"]));
        });

        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(server.url("/current/"), &["l1", "l2"]);
        let pipeline = BestsellerPipeline::new(
            MockStore::default(),
            MockNotifier::default(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let records = pipeline.extract().await.unwrap();

        first.assert();
        second.assert();
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(records[2].list_name, "List Two");
        assert_eq!(records[0].published_date, "2024-01-07");
        assert!(!pipeline.run_log().error_path().exists());
    }

    #[tokio::test]
    async fn test_extract_skips_malformed_list_and_logs_once() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/current/l1.json");
            then.status(200).json_body(list_body("List One", &["A"]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/current/broken.json");
            then.status(200)
                .json_body(serde_json::json!({"status": "OK", "results": {"list_name": "Broken"}}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/current/l3.json");
            then.status(200).json_body(list_body("List Three", &["C"]));
        });

        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(server.url("/current/"), &["l1", "broken", "l3"]);
        let pipeline = BestsellerPipeline::new(
            MockStore::default(),
            MockNotifier::default(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let records = pipeline.extract().await.unwrap();

        let lists: Vec<&str> = records.iter().map(|r| r.list_name.as_str()).collect();
        assert_eq!(lists, vec!["List One", "List Three"]);

        let errors = read(pipeline.run_log().error_path());
        assert_eq!(errors.lines().count(), 1);
        assert!(errors.starts_with("API response error (broken)"));
    }

    #[tokio::test]
    async fn test_extract_empty_list_is_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/current/l1.json");
            then.status(200).json_body(list_body("List One", &[]));
        });

        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(server.url("/current/"), &["l1"]);
        let pipeline = BestsellerPipeline::new(
            MockStore::default(),
            MockNotifier::default(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let records = pipeline.extract().await.unwrap();

        assert!(records.is_empty());
        assert!(!pipeline.run_log().error_path().exists());
    }

    #[tokio::test]
    async fn test_extract_transport_failure_returns_nothing_and_stops() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path("/current/l1.json");
            then.status(200).json_body(list_body("List One", &["A"]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/current/l2.json");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(list_body("List Two", &["B"]));
        });
        let third = server.mock(|when, then| {
            when.method(GET).path("/current/l3.json");
            then.status(200).json_body(list_body("List Three", &["C"]));
        });

        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(server.url("/current/"), &["l1", "l2", "l3"]);
        let mut pipeline = BestsellerPipeline::new(
            MockStore::default(),
            MockNotifier::default(),
            config,
            RunLog::in_dir(dir.path()),
        );
        let client = Client::builder()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        pipeline.fetcher = ListFetcher::new(client, server.url("/current/"), "test-key");

        let records = pipeline.extract().await.unwrap();

        assert!(records.is_empty());
        first.assert();
        third.assert_hits(0);
        let errors = read(pipeline.run_log().error_path());
        assert!(errors.starts_with("fetch error (l2)"));
        assert_eq!(errors.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_extract_non_json_body_aborts_collection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/current/l1.json");
            then.status(200).json_body(list_body("List One", &["A"]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/current/l2.json");
            then.status(502).body("<html>502 Bad Gateway</html>");
        });
        let third = server.mock(|when, then| {
            when.method(GET).path("/current/l3.json");
            then.status(200).json_body(list_body("List Three", &["C"]));
        });

        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(server.url("/current/"), &["l1", "l2", "l3"]);
        let pipeline = BestsellerPipeline::new(
            MockStore::default(),
            MockNotifier::default(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let records = pipeline.extract().await.unwrap();

        assert!(records.is_empty());
        third.assert_hits(0);
        let errors = read(pipeline.run_log().error_path());
        assert!(errors.starts_with("fetch error (l2)"));
        assert_eq!(errors.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_header_then_plain_text_and_sends_html() {
        let dir = TempDir::new().unwrap();
        let store = MockStore::default();
        let notifier = MockNotifier::default();
        let config = MockConfig::new("http://unused.test/".to_string(), &[]);
        let pipeline = BestsellerPipeline::new(
            store.clone(),
            notifier.clone(),
            config,
            RunLog::in_dir(dir.path()),
        )
        .with_month("January");

        let output = FormattedOutput {
            plain_text: "## L1\n\n- A by X published on 2024-01-07\n\n---\n\n".to_string(),
            rich_text: "<h2>L1</h2>\n<ul>\n<li>A by X published on 2024-01-07</li>\n</ul>"
                .to_string(),
        };

        let report = pipeline.load(output.clone()).await.unwrap();

        assert!(report.note_appended);
        assert_eq!(report.email_receipt.as_deref(), Some("250 2.0.0 OK queued"));

        let entries = store.entries().await;
        assert_eq!(
            entries,
            vec![format!(
                "# NEW READING COLLECTION - MONTH OF January\n\n{}",
                output.plain_text
            )]
        );

        let sent = notifier.sent.lock().await.clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "NYT Bestsellers Appended - Month of January");
        assert_eq!(sent[0].html_body, output.rich_text);

        let log = read(pipeline.run_log().output_path());
        assert_eq!(log, "Appended to vault.\nEmail sent: 250 2.0.0 OK queued\n");
    }

    #[tokio::test]
    async fn test_load_append_failure_still_sends_email() {
        let dir = TempDir::new().unwrap();
        let notifier = MockNotifier::default();
        let config = MockConfig::new("http://unused.test/".to_string(), &[]);
        let pipeline = BestsellerPipeline::new(
            MockStore::failing(),
            notifier.clone(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let report = pipeline.load(FormattedOutput::default()).await.unwrap();

        assert!(!report.note_appended);
        assert!(report.email_receipt.is_some());
        assert_eq!(notifier.sent.lock().await.len(), 1);
        let errors = read(pipeline.run_log().error_path());
        assert!(errors.starts_with("vault error: "));
        assert!(errors.contains("(memory)"));
        assert!(errors.contains("read-only vault"));
    }

    #[tokio::test]
    async fn test_load_email_failure_still_appends() {
        let dir = TempDir::new().unwrap();
        let store = MockStore::default();
        let config = MockConfig::new("http://unused.test/".to_string(), &[]);
        let pipeline = BestsellerPipeline::new(
            store.clone(),
            MockNotifier::failing(),
            config,
            RunLog::in_dir(dir.path()),
        );

        let report = pipeline.load(FormattedOutput::default()).await.unwrap();

        assert!(report.note_appended);
        assert!(report.email_receipt.is_none());
        assert_eq!(store.entries().await.len(), 1);
        let errors = read(pipeline.run_log().error_path());
        assert!(errors.starts_with("Email error:"));
    }

    #[test]
    fn test_header_and_subject_embed_month() {
        assert_eq!(note_header("May"), "# NEW READING COLLECTION - MONTH OF May");
        assert_eq!(email_subject("May"), "NYT Bestsellers Appended - Month of May");
        assert!(!current_month_name().is_empty());
    }
}
