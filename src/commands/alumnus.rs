//! Alumnus command - registration, subscriptions, applications and saved listings.

use std::path::Path;

use uuid::Uuid;

use super::context::{account_line, print_account, print_json, print_rows, CommandContext};
use crate::cli::args::{AlumnusAction, AlumnusArgs};
use crate::config::Config;
use crate::domain::{AccountKind, AccountResponse, AlumnusProfile};
use crate::errors::{AppError, AppResult};
use crate::infra::UploadKind;

/// Execute the alumnus command
pub async fn execute(args: AlumnusArgs, config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let services = ctx.services();
    let alumnus = Some(AccountKind::Alumnus);

    match args.action {
        AlumnusAction::Add {
            login_email,
            password,
            first_name,
            last_name,
            phone,
        } => {
            let profile = AlumnusProfile {
                first_name,
                last_name,
                phone_number: phone,
            };
            let account = services
                .auth()
                .register_alumnus(login_email, password, profile)
                .await?;
            print_account(account, alumnus)
        }
        AlumnusAction::Get { id } => {
            let account = services.accounts().get_account(id).await?;
            print_account(account, alumnus)
        }
        AlumnusAction::List(output) => {
            let rows: Vec<AccountResponse> = services
                .accounts()
                .list_accounts(alumnus)
                .await?
                .into_iter()
                .map(AccountResponse::from)
                .collect();
            print_rows(output, &rows, account_line)
        }
        AlumnusAction::UpdateEmail {
            id,
            password,
            new_login_email,
        } => {
            let account = services
                .accounts()
                .update_login_email(id, password, new_login_email)
                .await?;
            print_account(account, alumnus)
        }
        AlumnusAction::UpdatePassword {
            id,
            current_password,
            new_password,
        } => {
            let account = services
                .accounts()
                .update_password(id, current_password, new_password)
                .await?;
            tracing::info!(account_id = %account.id, "Password updated");
            Ok(())
        }
        AlumnusAction::Subscribe { id, company_ids } => {
            let outcome = services.subscriptions().subscribe(id, company_ids).await?;
            print_json(&outcome)
        }
        AlumnusAction::Apply {
            id,
            listing_id,
            resume,
            experience,
        } => apply(&ctx, id, listing_id, &resume, experience).await,
        AlumnusAction::Save { id, listing_id } => {
            let saved = services.saved_listings().save(id, listing_id).await?;
            print_json(&saved)
        }
    }
}

/// Copy the resume into the upload store, then record the application.
async fn apply(
    ctx: &CommandContext,
    alumnus_id: Uuid,
    listing_id: Uuid,
    resume: &Path,
    experience: Option<String>,
) -> AppResult<()> {
    let contents = tokio::fs::read(resume).await.map_err(|e| {
        AppError::bad_request(format!("Cannot read {}: {}", resume.display(), e))
    })?;
    let file_name = resume
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let path = ctx
        .files()
        .save(UploadKind::Resume, file_name, &contents)
        .await?;

    match ctx
        .services()
        .applications()
        .apply(alumnus_id, listing_id, path.clone(), experience)
        .await
    {
        Ok(application) => print_json(&application),
        Err(e) => {
            ctx.files().remove(&path).await;
            Err(e)
        }
    }
}
