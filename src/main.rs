use bestseller_digest::config::CONFIG_ENV_FILE;
use bestseller_digest::utils::{logger, run_log::RunLog, validation::Validate};
use bestseller_digest::{
    BestsellerPipeline, DigestConfig, DigestEngine, DigestError, LocalNoteFile, RunSummary,
    SmtpNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing config.env is fine; the process environment may carry everything.
    let env_file = dotenvy::from_filename(CONFIG_ENV_FILE).ok();

    let config = match DigestConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(false, false);
            return Err(report_config_error(&RunLog::in_dir("."), e));
        }
    };

    logger::init_logger(config.verbose, config.json_logs);

    match &env_file {
        Some(path) => tracing::debug!("Loaded settings from {}", path.display()),
        None => tracing::debug!("No {} found, using process environment", CONFIG_ENV_FILE),
    }
    tracing::debug!("Config: {:?}", config);

    let run_log = RunLog::in_dir(&config.log_dir);
    if let Err(e) = config.validate() {
        return Err(report_config_error(&run_log, e));
    }

    let notifier = match SmtpNotifier::from_config(&config) {
        Ok(notifier) => notifier,
        Err(e) => return Err(report_config_error(&run_log, e)),
    };
    let store = LocalNoteFile::new(config.vault_path.clone());
    let pipeline = BestsellerPipeline::new(store, notifier, config, run_log.clone());
    let engine = DigestEngine::new(pipeline, run_log);

    match engine.run().await {
        Ok(RunSummary::NothingFound) => {
            tracing::info!("No books found, nothing appended or sent");
        }
        Ok(RunSummary::Completed {
            records,
            lists,
            report,
        }) => {
            tracing::info!(
                "✅ Digest of {} books from {} lists done (vault appended: {}, email sent: {})",
                records,
                lists,
                report.note_appended,
                report.email_receipt.is_some()
            );
        }
        Err(e) => {
            // Every documented failure is logged inside the pipeline; this is a backstop.
            tracing::error!("❌ Digest run failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        }
    }

    Ok(())
}

fn report_config_error(run_log: &RunLog, e: DigestError) -> anyhow::Error {
    run_log.error(format!("config error: {}", e));
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    anyhow::Error::new(e).context("invalid configuration")
}
