//! Service container - one handle to every application service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AccountManager, AccountService, ApplicationManager, ApplicationService, AuthService,
    Authenticator, ListingManager, ListingService, NotificationService, Notifier,
    SavedListingManager, SavedListingService, SubscriptionManager, SubscriptionService,
};
use crate::config::Config;
use crate::infra::Persistence;
use crate::jobs::EmailQueue;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn listings(&self) -> Arc<dyn ListingService>;

    fn applications(&self) -> Arc<dyn ApplicationService>;

    fn saved_listings(&self) -> Arc<dyn SavedListingService>;

    fn subscriptions(&self) -> Arc<dyn SubscriptionService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountService>,
    listings: Arc<dyn ListingService>,
    applications: Arc<dyn ApplicationService>,
    saved_listings: Arc<dyn SavedListingService>,
    subscriptions: Arc<dyn SubscriptionService>,
    notifications: Arc<dyn NotificationService>,
}

impl Services {
    /// Wire every service over one database connection.
    ///
    /// Notification emails are handed to `email_queue`; pass a queue that
    /// drops jobs when no mail worker is running.
    pub fn new(db: DatabaseConnection, email_queue: Arc<dyn EmailQueue>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let notifications: Arc<dyn NotificationService> =
            Arc::new(Notifier::new(uow.clone(), email_queue));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            accounts: Arc::new(AccountManager::new(uow.clone())),
            listings: Arc::new(ListingManager::new(uow.clone(), notifications.clone())),
            applications: Arc::new(ApplicationManager::new(uow.clone(), notifications.clone())),
            saved_listings: Arc::new(SavedListingManager::new(uow.clone())),
            subscriptions: Arc::new(SubscriptionManager::new(uow)),
            notifications,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }

    fn listings(&self) -> Arc<dyn ListingService> {
        self.listings.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.applications.clone()
    }

    fn saved_listings(&self) -> Arc<dyn SavedListingService> {
        self.saved_listings.clone()
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionService> {
        self.subscriptions.clone()
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        self.notifications.clone()
    }
}
