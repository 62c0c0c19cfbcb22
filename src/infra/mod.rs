//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Caching (Redis) for rate limiting
//! - Uploaded file storage

pub mod cache;
pub mod db;
pub mod files;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use files::{relative_upload_path, FileStore, UploadKind};
pub use repositories::{
    AccountRepository, AccountStore, JobApplicationRepository, JobApplicationStore,
    JobListingRepository, JobListingStore, NotificationRepository, NotificationStore,
    SavedListingRepository, SavedListingStore, SubscriptionRepository, SubscriptionStore,
};
pub use unit_of_work::{Connection, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAccountRepository, MockJobApplicationRepository, MockJobListingRepository,
    MockNotificationRepository, MockSavedListingRepository, MockSubscriptionRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
