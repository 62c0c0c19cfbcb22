//! Admin command - admin accounts and account removal.

use super::context::{account_line, print_account, print_rows, CommandContext};
use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::domain::{AccountKind, AccountResponse};
use crate::errors::AppResult;

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let services = ctx.services();
    let admin = Some(AccountKind::Admin);

    match args.action {
        AdminAction::Add {
            login_email,
            password,
        } => {
            let account = services.auth().register_admin(login_email, password).await?;
            tracing::info!(account_id = %account.id, "Admin created");
            print_account(account, admin)
        }
        AdminAction::Get { id } => {
            let account = services.accounts().get_account(id).await?;
            print_account(account, admin)
        }
        AdminAction::GetByEmail { login_email } => {
            let account = services.accounts().get_by_email(&login_email).await?;
            print_account(account, admin)
        }
        AdminAction::List(output) => {
            let rows: Vec<AccountResponse> = services
                .accounts()
                .list_accounts(admin)
                .await?
                .into_iter()
                .map(AccountResponse::from)
                .collect();
            print_rows(output, &rows, account_line)
        }
        AdminAction::UpdateEmail {
            id,
            password,
            new_login_email,
        } => {
            let account = services
                .accounts()
                .update_login_email(id, password, new_login_email)
                .await?;
            print_account(account, admin)
        }
        AdminAction::UpdatePassword {
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
        AdminAction::UpdatePhoto { id, path } => {
            let account = services.accounts().set_profile_photo(id, path).await?;
            print_account(account, None)
        }
        AdminAction::Delete {
            target_id,
            requester,
        } => {
            services
                .accounts()
                .delete_account(requester.requester_id, target_id)
                .await?;
            println!("Deleted account {}", target_id);
            Ok(())
        }
    }
}
