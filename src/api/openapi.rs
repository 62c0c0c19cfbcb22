//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, application_handler, auth_handler, company_handler, listing_handler,
    notification_handler, saved_handler, subscription_handler,
};
use crate::domain::{
    AccountKind, AccountResponse, AlumnusChanges, AlumnusProfile, ApplicationStatus,
    ApprovalStatus, CompanyChanges, CompanyProfile, CompanySubscription, CompanySummary,
    JobApplication, JobListing, ListingWithCompany, Notification, PositionType, SavedJobListing,
    SubscribeOutcome,
};
use crate::services::TokenResponse;
use crate::types::{ListingPage, MessageResponse, PaginationMeta};

/// OpenAPI documentation for the Alumni Job Board
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alumni Job Board",
        version = "0.1.0",
        description = "Job board connecting alumni with companies, moderated by admins"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register_alumnus,
        auth_handler::register_company,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::identify,
        account_handler::get_current_account,
        account_handler::update_alumnus,
        account_handler::update_company,
        account_handler::update_email,
        account_handler::update_password,
        account_handler::upload_photo,
        account_handler::list_accounts,
        account_handler::get_account,
        account_handler::delete_account,
        account_handler::create_admin,
        company_handler::list_companies,
        company_handler::list_company_listings,
        listing_handler::search_listings,
        listing_handler::create_listing,
        listing_handler::list_all_listings,
        listing_handler::list_my_listings,
        listing_handler::get_listing,
        listing_handler::delete_listing,
        listing_handler::set_status,
        listing_handler::publish,
        listing_handler::unpublish,
        listing_handler::reject,
        listing_handler::request_deletion,
        listing_handler::request_update,
        application_handler::apply,
        application_handler::list_listing_applications,
        application_handler::list_all_applications,
        application_handler::list_my_applications,
        application_handler::update_resume,
        application_handler::review,
        application_handler::delete_application,
        saved_handler::list_saved_ids,
        saved_handler::save_listing,
        saved_handler::unsave_listing,
        subscription_handler::list_subscriptions,
        subscription_handler::subscribe,
        subscription_handler::unsubscribe,
        notification_handler::list_notifications,
        notification_handler::unread_count,
        notification_handler::mark_read,
        notification_handler::mark_all_read,
    ),
    components(
        schemas(
            AccountKind,
            AccountResponse,
            AlumnusProfile,
            CompanyProfile,
            AlumnusChanges,
            CompanyChanges,
            CompanySummary,
            PositionType,
            ApprovalStatus,
            JobListing,
            ListingWithCompany,
            ApplicationStatus,
            JobApplication,
            SavedJobListing,
            CompanySubscription,
            SubscribeOutcome,
            Notification,
            TokenResponse,
            MessageResponse,
            PaginationMeta,
            ListingPage,
            auth_handler::RegisterAlumnusRequest,
            auth_handler::RegisterCompanyRequest,
            auth_handler::LoginRequest,
            account_handler::UpdateAlumnusRequest,
            account_handler::UpdateCompanyRequest,
            account_handler::UpdateEmailRequest,
            account_handler::UpdatePasswordRequest,
            account_handler::CreateAdminRequest,
            account_handler::ProfileUpdateResponse,
            account_handler::PhotoForm,
            listing_handler::CreateListingRequest,
            listing_handler::SetStatusRequest,
            application_handler::ReviewRequest,
            application_handler::ApplyForm,
            application_handler::ResumeForm,
            subscription_handler::SubscribeRequest,
            notification_handler::UnreadCount,
            notification_handler::MarkedRead,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session cookie"),
        (name = "Accounts", description = "Profile maintenance and admin account management"),
        (name = "Companies", description = "Company directory"),
        (name = "Listings", description = "Job listings and moderation"),
        (name = "Applications", description = "Job applications"),
        (name = "Saved listings", description = "Alumni bookmarks"),
        (name = "Subscriptions", description = "Alumni subscriptions to companies"),
        (name = "Notifications", description = "Per-account notification inbox")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT from /auth/login; the access_token cookie is also accepted",
                        ))
                        .build(),
                ),
            );
        }
    }
}
