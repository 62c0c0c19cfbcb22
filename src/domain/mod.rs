//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod account;
pub mod company_subscription;
pub mod job_application;
pub mod job_listing;
pub mod notification;
pub mod password;
pub mod saved_job_listing;

pub use account::{
    Account, AccountKind, AccountProfile, AccountResponse, AlumnusChanges, AlumnusProfile,
    CompanyChanges, CompanyProfile, CompanySummary, NewAccount,
};
pub use company_subscription::{CompanySubscription, SubscribeOutcome};
pub use job_application::{ApplicationStatus, JobApplication};
pub use job_listing::{
    ApprovalStatus, JobListing, ListingSearch, ListingWithCompany, NewJobListing, PositionType,
};
pub use notification::{Audience, Dispatch, NewNotification, Notification};
pub use password::Password;
pub use saved_job_listing::SavedJobListing;
