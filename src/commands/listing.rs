//! Listing command - posting, search and moderation of job listings.

use super::context::{print_json, print_rows, CommandContext};
use crate::cli::args::{ListingAction, ListingArgs};
use crate::config::Config;
use crate::domain::{ApprovalStatus, JobListing, ListingSearch, NewJobListing, PositionType};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// One-line listing summary for table output.
pub fn listing_line(listing: &JobListing) -> String {
    format!(
        "{}  {:<18} {:<11} {:>7} TTD  {}",
        listing.id,
        listing.admin_approval_status.as_str(),
        listing.position_type.as_str(),
        listing.monthly_salary_ttd,
        listing.title
    )
}

/// Execute the listing command
pub async fn execute(args: ListingArgs, config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let listings = ctx.services().listings();

    match args.action {
        ListingAction::Add {
            company_id,
            title,
            position_type,
            description,
            monthly_salary_ttd,
            remote,
            site,
        } => {
            let draft = NewJobListing::new(
                company_id,
                &title,
                position_type.parse::<PositionType>()?,
                &description,
                monthly_salary_ttd,
                remote,
                site.as_deref(),
            )?;
            let listing = listings.create_listing(draft).await?;
            print_json(&listing)
        }
        ListingAction::Get { id } => print_json(&listings.get_listing(id).await?),
        ListingAction::List { requester, output } => {
            let rows = listings.list_all(requester.requester_id).await?;
            print_rows(output, &rows, listing_line)
        }
        ListingAction::Search {
            q,
            position_type,
            location,
            min_salary,
            max_salary,
            page,
            per_page,
            output,
        } => {
            let filters = ListingSearch {
                q,
                position_type: position_type
                    .as_deref()
                    .map(str::parse::<PositionType>)
                    .transpose()?,
                location,
                min_salary,
                max_salary,
            };
            let page = PaginationParams { page, per_page };
            let (rows, total) = listings.search(filters, page.clone()).await?;

            if output.json {
                return print_json(&Paginated::new(rows, page.page(), page.limit(), total));
            }
            for row in &rows {
                println!("{}  {}", listing_line(&row.listing), row.company_name);
            }
            println!("page {} of {} match(es)", page.page(), total);
            Ok(())
        }
        ListingAction::SetStatus {
            id,
            status,
            requester,
        } => {
            let status = status.parse::<ApprovalStatus>()?;
            let listing = listings
                .set_approval_status(requester.requester_id, id, status)
                .await?;
            print_json(&listing)
        }
        ListingAction::Publish { id, requester } => {
            let listing = listings.publish(requester.requester_id, id).await?;
            print_json(&listing)
        }
        ListingAction::Delete { id, requester } => {
            listings.delete_listing(requester.requester_id, id).await?;
            println!("Deleted listing {}", id);
            Ok(())
        }
    }
}
