//! Per-list retrieval from the bestseller API.

use crate::domain::model::{BookRecord, ListFetchOutcome};
use reqwest::Client;
use serde_json::Value;
use std::ops::ControlFlow;

pub struct ListFetcher {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ListFetcher {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn list_url(&self, list: &str) -> String {
        format!("{}{}.json", self.base_url, list)
    }

    pub async fn fetch_list(&self, list: &str) -> ListFetchOutcome {
        let url = self.list_url(list);
        tracing::debug!("Making API request to: {}", url);

        let response = match self
            .client
            .get(&url)
            .query(&[("api-key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ListFetchOutcome::TransportFailed {
                    list: list.to_string(),
                    error: e.without_url().to_string(),
                }
            }
        };

        tracing::debug!("API response status: {}", response.status());

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return ListFetchOutcome::TransportFailed {
                    list: list.to_string(),
                    error: e.without_url().to_string(),
                }
            }
        };

        parse_list_payload(list, &body)
    }
}

/// Turns one response body into an outcome.
///
/// A body that is not JSON at all aborts like a transport failure. Valid JSON without a
/// `results.books` array skips the list. Individual book fields are read leniently.
pub fn parse_list_payload(list: &str, body: &str) -> ListFetchOutcome {
    let payload: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return ListFetchOutcome::TransportFailed {
                list: list.to_string(),
                error: format!("body is not JSON ({}): {}", e, truncate(body, 200)),
            }
        }
    };

    let results = payload.get("results");
    let books = match results.and_then(|r| r.get("books")).and_then(Value::as_array) {
        Some(books) => books,
        None => {
            return ListFetchOutcome::Skipped {
                list: list.to_string(),
                reason: payload.to_string(),
            }
        }
    };

    let list_name = results
        .and_then(|r| r.get("list_name"))
        .map(field_text)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| list.to_string());
    let published_date = results
        .and_then(|r| r.get("published_date"))
        .map(field_text)
        .unwrap_or_default();

    let records = books
        .iter()
        .map(|book| BookRecord {
            title: book.get("title").map(field_text).unwrap_or_default(),
            author: book.get("author").map(field_text).unwrap_or_default(),
            list_name: list_name.clone(),
            published_date: published_date.clone(),
        })
        .collect();

    ListFetchOutcome::Fetched {
        list: list.to_string(),
        records,
    }
}

/// Strings verbatim, null as empty, anything else in its JSON form.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Accumulates per-list outcomes.
///
/// Skipped and empty lists contribute nothing and collection goes on; a transport
/// failure stops collection and discards everything gathered so far.
#[derive(Debug, Default)]
pub struct Collection {
    records: Vec<BookRecord>,
    aborted: bool,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, outcome: ListFetchOutcome) -> ControlFlow<()> {
        if self.aborted {
            return ControlFlow::Break(());
        }

        match outcome {
            ListFetchOutcome::Fetched { records, .. } => {
                self.records.extend(records);
                ControlFlow::Continue(())
            }
            ListFetchOutcome::Skipped { .. } => ControlFlow::Continue(()),
            ListFetchOutcome::TransportFailed { .. } => {
                self.aborted = true;
                ControlFlow::Break(())
            }
        }
    }

    pub fn into_records(self) -> Vec<BookRecord> {
        if self.aborted {
            Vec::new()
        } else {
            self.records
        }
    }
}
