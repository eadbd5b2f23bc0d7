use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::run_log::RunLog;
use std::collections::HashSet;

pub struct DigestEngine<P: Pipeline> {
    pipeline: P,
    run_log: RunLog,
}

impl<P: Pipeline> DigestEngine<P> {
    pub fn new(pipeline: P, run_log: RunLog) -> Self {
        Self { pipeline, run_log }
    }

    /// Fetch, then format and deliver. Stops after fetching when nothing came back.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting bestseller digest");

        let books = self.pipeline.extract().await?;
        if books.is_empty() {
            self.run_log.output("No books found.");
            return Ok(RunSummary::NothingFound);
        }

        let records = books.len();
        let lists = books
            .iter()
            .map(|b| b.list_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        tracing::info!("Fetched {} books across {} lists", records, lists);

        let output = self.pipeline.transform(books).await?;
        let report = self.pipeline.load(output).await?;

        tracing::info!(
            "Digest finished (vault: {}, email: {})",
            if report.note_appended { "appended" } else { "failed" },
            if report.email_receipt.is_some() { "sent" } else { "failed" }
        );

        Ok(RunSummary::Completed {
            records,
            lists,
            report,
        })
    }
}
