//! Company subscription service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AccountKind, CompanySubscription, SubscribeOutcome};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Subscribe to several companies at once; existing subscriptions are skipped.
    /// Either every new subscription is stored or none is.
    async fn subscribe(&self, alumnus_id: Uuid, company_ids: Vec<Uuid>)
        -> AppResult<SubscribeOutcome>;

    async fn is_subscribed(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<bool>;

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<CompanySubscription>>;

    async fn list_subscribers(&self, company_id: Uuid) -> AppResult<Vec<CompanySubscription>>;

    /// Allowed for the alumnus itself or an admin
    async fn unsubscribe(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<()>;
}

pub struct SubscriptionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SubscriptionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SubscriptionService for SubscriptionManager<U> {
    async fn subscribe(
        &self,
        alumnus_id: Uuid,
        company_ids: Vec<Uuid>,
    ) -> AppResult<SubscribeOutcome> {
        self.uow
            .accounts()
            .find_by_id(alumnus_id)
            .await?
            .ok_or(AppError::Forbidden)?
            .ensure_kind(AccountKind::Alumnus)?;

        let mut wanted = company_ids;
        wanted.sort();
        wanted.dedup();
        if wanted.is_empty() {
            return Err(AppError::validation("Select at least one company"));
        }

        let companies = self.uow.accounts().find_many(wanted.clone()).await?;
        let unknown = wanted
            .iter()
            .any(|id| !companies.iter().any(|c| c.id == *id && c.kind() == AccountKind::Company));
        if unknown {
            return Err(AppError::NotFound);
        }

        let tx = self.uow.begin().await?;
        let mut outcome = SubscribeOutcome::default();
        for company_id in wanted {
            if tx.subscriptions().find(alumnus_id, company_id).await?.is_some() {
                outcome.already.push(company_id);
                continue;
            }
            tx.subscriptions().create(alumnus_id, company_id).await?;
            outcome.added.push(company_id);
        }
        tx.commit().await?;

        tracing::info!(
            alumnus_id = %alumnus_id,
            added = outcome.added.len(),
            already = outcome.already.len(),
            "Subscriptions updated"
        );
        Ok(outcome)
    }

    async fn is_subscribed(&self, alumnus_id: Uuid, company_id: Uuid) -> AppResult<bool> {
        Ok(self
            .uow
            .subscriptions()
            .find(alumnus_id, company_id)
            .await?
            .is_some())
    }

    async fn list_for_alumnus(&self, alumnus_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        self.uow.subscriptions().list_by_alumnus(alumnus_id).await
    }

    async fn list_subscribers(&self, company_id: Uuid) -> AppResult<Vec<CompanySubscription>> {
        self.uow.subscriptions().list_by_company(company_id).await
    }

    async fn unsubscribe(
        &self,
        requester_id: Uuid,
        alumnus_id: Uuid,
        company_id: Uuid,
    ) -> AppResult<()> {
        if requester_id != alumnus_id {
            self.uow
                .accounts()
                .find_by_id(requester_id)
                .await?
                .ok_or(AppError::Forbidden)?
                .ensure_kind(AccountKind::Admin)?;
        }

        self.uow.subscriptions().delete(alumnus_id, company_id).await
    }
}
