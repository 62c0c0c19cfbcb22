//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod account;
pub mod alumnus_profile;
pub mod company_profile;
pub mod company_subscription;
pub mod job_application;
pub mod job_listing;
pub mod notification;
pub mod saved_job_listing;
