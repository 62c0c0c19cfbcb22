//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill the
//! board's use cases. Each one reaches storage through the Unit of Work and
//! reports events through the notification service.

mod account_service;
mod application_service;
mod auth_service;
pub mod container;
mod listing_service;
mod notification_service;
mod saved_listing_service;
mod subscription_service;

pub use container::{ServiceContainer, Services};

pub use account_service::{AccountManager, AccountService};
pub use application_service::{ApplicationManager, ApplicationService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use listing_service::{ListingManager, ListingService};
pub use notification_service::{NotificationService, Notifier};
pub use saved_listing_service::{SavedListingManager, SavedListingService};
pub use subscription_service::{SubscriptionManager, SubscriptionService};

#[cfg(any(test, feature = "test-utils"))]
pub use account_service::MockAccountService;
#[cfg(any(test, feature = "test-utils"))]
pub use application_service::MockApplicationService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_service::MockNotificationService;
