//! Company command - company accounts, their listings and notifications.

use super::context::{account_line, print_account, print_json, print_rows, CommandContext};
use super::listing::listing_line;
use crate::cli::args::{CompanyAction, CompanyArgs};
use crate::config::Config;
use crate::domain::{AccountKind, AccountResponse, CompanyProfile};
use crate::errors::AppResult;

/// Execute the company command
pub async fn execute(args: CompanyArgs, config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let services = ctx.services();
    let company = Some(AccountKind::Company);

    match args.action {
        CompanyAction::Add {
            login_email,
            password,
            company_name,
            mailing_address,
            website,
            phone,
            public_email,
        } => {
            let profile = CompanyProfile {
                company_name,
                mailing_address,
                website_url: website,
                phone_number: phone,
                public_email,
            };
            let account = services
                .auth()
                .register_company(login_email, password, profile)
                .await?;
            print_account(account, company)
        }
        CompanyAction::Get { id } => {
            let account = services.accounts().get_account(id).await?;
            print_account(account, company)
        }
        CompanyAction::List(output) => {
            let rows: Vec<AccountResponse> = services
                .accounts()
                .list_accounts(company)
                .await?
                .into_iter()
                .map(AccountResponse::from)
                .collect();
            print_rows(output, &rows, account_line)
        }
        CompanyAction::Listings { id, output } => {
            let listings = services.listings().list_for_company(id).await?;
            print_rows(output, &listings, listing_line)
        }
        CompanyAction::Notifications { id } => {
            let notifications = services.notifications().list_for(id).await?;
            print_json(&notifications)
        }
    }
}
