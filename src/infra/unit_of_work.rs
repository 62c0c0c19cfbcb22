//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository behind one object so services can
//! be handed a single dependency. [`UnitOfWork::begin`] opens a transaction
//! and returns a unit whose repositories all write through it, so a service
//! can make its primary change and the notifications about it land together
//! or not at all.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    ExecResult, IsolationLevel, QueryResult, Statement, TransactionTrait,
};

use super::repositories::{
    AccountRepository, AccountStore, JobApplicationRepository, JobApplicationStore,
    JobListingRepository, JobListingStore, NotificationRepository, NotificationStore,
    SavedListingRepository, SavedListingStore, SubscriptionRepository, SubscriptionStore,
};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn job_listings(&self) -> Arc<dyn JobListingRepository>;

    fn applications(&self) -> Arc<dyn JobApplicationRepository>;

    fn saved_listings(&self) -> Arc<dyn SavedListingRepository>;

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository>;

    fn notifications(&self) -> Arc<dyn NotificationRepository>;

    /// Open a ReadCommitted transaction.
    ///
    /// Writes made through the returned unit become visible only once
    /// [`commit`](UnitOfWork::commit) succeeds. Dropping it uncommitted rolls
    /// everything back.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Commit the transaction this unit was opened with.
    ///
    /// A unit over the pool has nothing pending, so this is a no-op there.
    async fn commit(&self) -> AppResult<()>;
}

/// Where repository statements run.
#[derive(Clone)]
pub enum Connection {
    Pool(DatabaseConnection),
    Transaction(Arc<DatabaseTransaction>),
    /// The transaction was committed; every statement fails.
    Closed,
}

fn closed() -> DbErr {
    DbErr::Custom("transaction already committed".to_string())
}

#[async_trait]
impl ConnectionTrait for Connection {
    fn get_database_backend(&self) -> DbBackend {
        match self {
            Connection::Pool(db) => db.get_database_backend(),
            Connection::Transaction(txn) => txn.get_database_backend(),
            Connection::Closed => DbBackend::Postgres,
        }
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        match self {
            Connection::Pool(db) => db.execute(stmt).await,
            Connection::Transaction(txn) => txn.execute(stmt).await,
            Connection::Closed => Err(closed()),
        }
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        match self {
            Connection::Pool(db) => db.execute_unprepared(sql).await,
            Connection::Transaction(txn) => txn.execute_unprepared(sql).await,
            Connection::Closed => Err(closed()),
        }
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        match self {
            Connection::Pool(db) => db.query_one(stmt).await,
            Connection::Transaction(txn) => txn.query_one(stmt).await,
            Connection::Closed => Err(closed()),
        }
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        match self {
            Connection::Pool(db) => db.query_all(stmt).await,
            Connection::Transaction(txn) => txn.query_all(stmt).await,
            Connection::Closed => Err(closed()),
        }
    }
}

/// Concrete implementation of UnitOfWork over the connection pool
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn connection(&self) -> Connection {
        Connection::Pool(self.db.clone())
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        Arc::new(AccountStore::new(self.connection()))
    }

    fn job_listings(&self) -> Arc<dyn JobListingRepository> {
        Arc::new(JobListingStore::new(self.connection()))
    }

    fn applications(&self) -> Arc<dyn JobApplicationRepository> {
        Arc::new(JobApplicationStore::new(self.connection()))
    }

    fn saved_listings(&self) -> Arc<dyn SavedListingRepository> {
        Arc::new(SavedListingStore::new(self.connection()))
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository> {
        Arc::new(SubscriptionStore::new(self.connection()))
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        Arc::new(NotificationStore::new(self.connection()))
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;
        Ok(Box::new(TransactionUnit {
            txn: Mutex::new(Some(Arc::new(txn))),
        }))
    }

    async fn commit(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Unit of work bound to one open transaction.
///
/// Repositories handed out share the transaction. They must be dropped
/// before `commit`, which needs sole ownership of it.
struct TransactionUnit {
    txn: Mutex<Option<Arc<DatabaseTransaction>>>,
}

impl TransactionUnit {
    fn connection(&self) -> Connection {
        let slot = self.txn.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(txn) => Connection::Transaction(txn.clone()),
            None => Connection::Closed,
        }
    }
}

#[async_trait]
impl UnitOfWork for TransactionUnit {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        Arc::new(AccountStore::new(self.connection()))
    }

    fn job_listings(&self) -> Arc<dyn JobListingRepository> {
        Arc::new(JobListingStore::new(self.connection()))
    }

    fn applications(&self) -> Arc<dyn JobApplicationRepository> {
        Arc::new(JobApplicationStore::new(self.connection()))
    }

    fn saved_listings(&self) -> Arc<dyn SavedListingRepository> {
        Arc::new(SavedListingStore::new(self.connection()))
    }

    fn subscriptions(&self) -> Arc<dyn SubscriptionRepository> {
        Arc::new(SubscriptionStore::new(self.connection()))
    }

    fn notifications(&self) -> Arc<dyn NotificationRepository> {
        Arc::new(NotificationStore::new(self.connection()))
    }

    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Err(AppError::internal("Nested transactions are not supported"))
    }

    async fn commit(&self) -> AppResult<()> {
        let shared = self
            .txn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| AppError::internal("Transaction already committed"))?;

        let txn = Arc::try_unwrap(shared).map_err(|_| {
            AppError::internal("Transaction still borrowed by a repository at commit")
        })?;
        txn.commit().await?;
        Ok(())
    }
}

/// Future returned by a transactional closure, borrowing the transaction.
pub(crate) type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Run a multi-statement write atomically.
///
/// On the pool this opens a ReadCommitted transaction, committed when `f`
/// succeeds and rolled back otherwise. Inside an open transaction `f` joins
/// it, and the outer unit decides whether everything commits.
pub(crate) async fn with_transaction<T, F>(conn: &Connection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    let db = match conn {
        Connection::Pool(db) => db,
        Connection::Transaction(txn) => return f(txn.as_ref()).await,
        Connection::Closed => return Err(AppError::from(closed())),
    };

    let txn = db
        .begin_with_config(
            Some(IsolationLevel::ReadCommitted),
            Some(AccessMode::ReadWrite),
        )
        .await?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
