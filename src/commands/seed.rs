//! Seed command - demo accounts and listings for local development.

use super::context::CommandContext;
use crate::config::Config;
use crate::domain::{AlumnusProfile, CompanyProfile, NewJobListing, PositionType};
use crate::errors::{AppError, AppResult};

const SEED_ADMIN_EMAIL: &str = "bob@mail.com";

struct SeedCompany {
    login_email: &'static str,
    name: &'static str,
    mailing_address: &'static str,
    public_email: &'static str,
    website: &'static str,
    phone: &'static str,
    listing: (&'static str, PositionType, &'static str, i32, &'static str),
}

const SEED_COMPANIES: [SeedCompany; 2] = [
    SeedCompany {
        login_email: "company@mail.com",
        name: "company1",
        mailing_address: "1 Eastern Main Road, Curepe",
        public_email: "public@company1.com",
        website: "https://company1.example.com",
        phone: "1868-555-0101",
        listing: ("listing1", PositionType::PartTime, "job description1", 8000, "Curepe"),
    },
    SeedCompany {
        login_email: "company@mail2.com",
        name: "company2",
        mailing_address: "2 Frederick Street, Port of Spain",
        public_email: "public@company2.com",
        website: "https://company2.example.com",
        phone: "1868-555-0102",
        listing: (
            "listing2",
            PositionType::FullTime,
            "job description2",
            4000,
            "Port of Spain",
        ),
    },
];

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let ctx = CommandContext::connect(config).await?;
    let services = ctx.services();

    match services.accounts().get_by_email(SEED_ADMIN_EMAIL).await {
        Ok(_) => {
            tracing::warn!("Seed data already present, nothing to do");
            return Ok(());
        }
        Err(AppError::NotFound) => {}
        Err(e) => return Err(e),
    }

    let auth = services.auth();
    auth.register_admin(SEED_ADMIN_EMAIL.to_string(), "bobpass123".to_string())
        .await?;
    tracing::info!(email = SEED_ADMIN_EMAIL, "Seeded admin");

    auth.register_alumnus(
        "rob@mail.com".to_string(),
        "robpass123".to_string(),
        AlumnusProfile {
            first_name: "Rob".to_string(),
            last_name: "Singh".to_string(),
            phone_number: Some("1868-333-4444".to_string()),
        },
    )
    .await?;
    tracing::info!(email = "rob@mail.com", "Seeded alumnus");

    for seed in SEED_COMPANIES {
        let company = auth
            .register_company(
                seed.login_email.to_string(),
                "compass123".to_string(),
                CompanyProfile {
                    company_name: seed.name.to_string(),
                    mailing_address: seed.mailing_address.to_string(),
                    website_url: Some(seed.website.to_string()),
                    phone_number: Some(seed.phone.to_string()),
                    public_email: Some(seed.public_email.to_string()),
                },
            )
            .await?;

        let (title, position_type, description, salary, site) = seed.listing;
        let draft = NewJobListing::new(
            company.id,
            title,
            position_type,
            description,
            salary,
            false,
            Some(site),
        )?;
        let listing = services.listings().create_listing(draft).await?;
        tracing::info!(company = seed.name, listing_id = %listing.id, "Seeded company and listing");
    }

    println!("Seed data created");
    Ok(())
}
