//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, FileStore};
use crate::jobs::EmailQueue;
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// All application services
    pub services: Arc<dyn ServiceContainer>,
    /// Redis cache (rate limiting)
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
    /// Uploaded resumes and profile photos
    pub files: Arc<FileStore>,
}

impl AppState {
    /// Build the state and wire the services over the database connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        email_queue: Arc<dyn EmailQueue>,
        config: Config,
    ) -> Self {
        let files = Arc::new(FileStore::from_config(&config));
        let services = Arc::new(Services::new(
            database.connection(),
            email_queue,
            config,
        ));

        Self::new(services, cache, database, files)
    }

    /// Create application state with manually injected services.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Arc<Cache>,
        database: Arc<Database>,
        files: Arc<FileStore>,
    ) -> Self {
        Self {
            services,
            cache,
            database,
            files,
        }
    }
}
