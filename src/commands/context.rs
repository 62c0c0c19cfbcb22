//! Shared setup for the entity commands.
//!
//! Entity commands talk to the same services the HTTP API uses, so each one
//! opens the database, the email queue and the upload store once and
//! hands out a [`ServiceContainer`].

use std::sync::Arc;

use serde::Serialize;

use crate::cli::args::OutputArgs;
use crate::config::Config;
use crate::domain::{Account, AccountKind, AccountResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, FileStore};
use crate::jobs::{ApalisEmailQueue, EmailQueue};
use crate::services::{ServiceContainer, Services};

pub struct CommandContext {
    services: Arc<dyn ServiceContainer>,
    files: FileStore,
}

impl CommandContext {
    /// Connect to the database (applying migrations) and wire the services.
    pub async fn connect(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let email_queue: Arc<dyn EmailQueue> = Arc::new(ApalisEmailQueue::connect(&config).await?);
        let files = FileStore::from_config(&config);
        let services = Services::new(db.connection(), email_queue, config);

        Ok(Self {
            services: Arc::new(services),
            files,
        })
    }

    pub fn services(&self) -> &dyn ServiceContainer {
        self.services.as_ref()
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }
}

/// Print one account, refusing accounts of another kind.
pub fn print_account(account: Account, kind: Option<AccountKind>) -> AppResult<()> {
    if let Some(kind) = kind {
        account.ensure_kind(kind).map_err(|_| AppError::NotFound)?;
    }
    print_json(&AccountResponse::from(account))
}

/// `id  email  name` line used by the account list commands.
pub fn account_line(account: &AccountResponse) -> String {
    let name = match (&account.alumnus, &account.company) {
        (Some(alumnus), _) => format!("{} {}", alumnus.first_name, alumnus.last_name),
        (_, Some(company)) => company.company_name.clone(),
        _ => String::new(),
    };
    format!("{}  {:<8} {:<32} {}", account.id, account.kind.as_str(), account.login_email, name)
}

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal(format!("Failed to render JSON: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

/// Print rows as JSON or one line each, depending on `--json`.
pub fn print_rows<T, F>(output: OutputArgs, rows: &[T], line: F) -> AppResult<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    if output.json {
        return print_json(rows);
    }

    for row in rows {
        println!("{}", line(row));
    }
    println!("{} row(s)", rows.len());
    Ok(())
}
