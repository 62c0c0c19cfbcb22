//! Jobs command - Email worker and queue inspection.
//!
//! - `work`: deliver queued notification emails until Ctrl+C
//! - `list`: job counts by status
//! - `clear`: remove failed jobs

use apalis::prelude::*;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_EMAIL};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::jobs::{email_job_handler, ApalisEmailQueue, Mailer};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Run the email worker over the apalis PostgreSQL storage.
async fn run_worker(config: &Config) -> AppResult<()> {
    let queue = ApalisEmailQueue::connect(config).await?;
    let mailer = Mailer::from_settings(&config.smtp)?;
    if !mailer.is_configured() {
        tracing::warn!("SMTP_HOST not set, emails will be logged instead of sent");
    }

    let worker = WorkerBuilder::new(JOB_NAME_EMAIL)
        .data(mailer)
        .backend(queue.storage())
        .build_fn(email_job_handler);

    tracing::info!("Email worker started. Press Ctrl+C to stop.");
    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Email worker stopped.");
    Ok(())
}

async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Ok(Database::connect_without_migrations(config)
        .await?
        .connection())
}

/// Whether apalis has created its schema yet.
async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// Job counts by status
#[derive(Debug, Default, PartialEq, Eq)]
struct QueueCounts {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
}

impl QueueCounts {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending += count,
            "Running" => self.running += count,
            "Failed" | "Killed" => self.failed += count,
            "Done" => self.done += count,
            other => tracing::debug!(status = other, count, "Ignoring job status"),
        }
    }
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Run `serve` or `jobs work` first.");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut counts = QueueCounts::default();
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            counts.record(&status, count);
        }
    }

    println!("=== Job queue ===");
    println!("Pending:  {}", counts.pending);
    println!("Running:  {}", counts.running);
    println!("Failed:   {}", counts.failed);
    println!("Done:     {}", counts.done);

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = connect(config).await?;

    if !queue_initialized(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status IN ('Failed', 'Killed')",
        ))
        .await?;

    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_counts_fold_killed_into_failed() {
        let mut counts = QueueCounts::default();
        counts.record("Pending", 3);
        counts.record("Failed", 1);
        counts.record("Killed", 2);
        counts.record("Retry", 5);

        assert_eq!(
            counts,
            QueueCounts {
                pending: 3,
                running: 0,
                failed: 3,
                done: 0,
            }
        );
    }
}
