//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod account_repository;
pub(crate) mod entities;
mod job_application_repository;
mod job_listing_repository;
mod notification_repository;
mod saved_listing_repository;
mod subscription_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use job_application_repository::{JobApplicationRepository, JobApplicationStore};
pub use job_listing_repository::{JobListingRepository, JobListingStore};
pub use notification_repository::{NotificationRepository, NotificationStore};
pub use saved_listing_repository::{SavedListingRepository, SavedListingStore};
pub use subscription_repository::{SubscriptionRepository, SubscriptionStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_application_repository::MockJobApplicationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_listing_repository::MockJobListingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::MockNotificationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use saved_listing_repository::MockSavedListingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use subscription_repository::MockSubscriptionRepository;
