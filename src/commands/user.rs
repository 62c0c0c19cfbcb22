//! User command - lookups across every account kind.

use super::context::{account_line, print_account, print_rows, CommandContext};
use crate::cli::args::{UserAction, UserArgs};
use crate::config::Config;
use crate::domain::AccountResponse;
use crate::errors::AppResult;

/// Execute the user command
pub async fn execute(args: UserArgs, config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let accounts = ctx.services().accounts();

    match args.action {
        UserAction::List(output) => {
            let rows: Vec<AccountResponse> = accounts
                .list_accounts(None)
                .await?
                .into_iter()
                .map(AccountResponse::from)
                .collect();
            print_rows(output, &rows, account_line)
        }
        UserAction::GetByEmail { login_email } => {
            print_account(accounts.get_by_email(&login_email).await?, None)
        }
    }
}
