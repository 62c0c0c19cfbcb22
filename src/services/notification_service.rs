//! Notification service - in-app notifications plus queued emails.
//!
//! Notifying is split in two. [`NotificationService::prepare`] resolves the
//! audience and validates the message; the caller stores the resulting rows
//! in the same transaction as the change they describe. Once that commits,
//! [`NotificationService::deliver`] pushes one email per recipient onto the
//! queue. Email is best effort: a failed enqueue is logged and never undoes
//! the stored notifications.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{EMAIL_ENQUEUE_CONCURRENCY, NOTIFICATION_EMAIL_SUBJECT};
use crate::domain::notification::validate_message;
use crate::domain::notification::rows_of;
use crate::domain::{AccountKind, Audience, Dispatch, Notification};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::jobs::{EmailJob, EmailQueue};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Resolve who receives `message`; nothing is written
    async fn prepare(&self, audience: Audience, message: String) -> AppResult<Dispatch>;

    /// Enqueue one email per recipient, after the rows are committed
    async fn deliver(&self, dispatches: Vec<Dispatch>);

    async fn list_for(&self, account_id: Uuid) -> AppResult<Vec<Notification>>;

    async fn unread_count(&self, account_id: Uuid) -> AppResult<u64>;

    async fn mark_read(&self, account_id: Uuid, notification_id: Uuid) -> AppResult<Notification>;

    async fn mark_all_read(&self, account_id: Uuid) -> AppResult<u64>;
}

pub struct Notifier<U: UnitOfWork> {
    uow: Arc<U>,
    emails: Arc<dyn EmailQueue>,
}

impl<U: UnitOfWork> Notifier<U> {
    pub fn new(uow: Arc<U>, emails: Arc<dyn EmailQueue>) -> Self {
        Self { uow, emails }
    }

    async fn enqueue_emails(&self, dispatch: &Dispatch) {
        let emails = &self.emails;
        let message = dispatch.message.as_str();
        stream::iter(&dispatch.recipients)
            .for_each_concurrent(EMAIL_ENQUEUE_CONCURRENCY, |account| async move {
                let job = EmailJob::new(
                    account.login_email.clone(),
                    NOTIFICATION_EMAIL_SUBJECT,
                    message,
                );
                if let Err(e) = emails.enqueue(job).await {
                    tracing::warn!(
                        recipient = %account.id,
                        error = %e,
                        "Failed to enqueue notification email"
                    );
                }
            })
            .await;
    }
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for Notifier<U> {
    async fn prepare(&self, audience: Audience, message: String) -> AppResult<Dispatch> {
        validate_message(&message)?;

        let recipients = match audience {
            Audience::Account(id) => {
                vec![self.uow.accounts().find_by_id(id).await?.ok_or_not_found()?]
            }
            Audience::Company(id) => {
                let company = self
                    .uow
                    .accounts()
                    .find_by_id(id)
                    .await?
                    .filter(|a| a.kind() == AccountKind::Company)
                    .ok_or(AppError::NotFound)?;
                vec![company]
            }
            Audience::Admins => self.uow.accounts().list(Some(AccountKind::Admin)).await?,
            Audience::Subscribers(company_id) => {
                let alumni_ids = self
                    .uow
                    .subscriptions()
                    .list_by_company(company_id)
                    .await?
                    .into_iter()
                    .map(|s| s.alumnus_id)
                    .collect();
                self.uow.accounts().find_many(alumni_ids).await?
            }
        };

        if recipients.is_empty() {
            tracing::debug!(?audience, "Notification has no recipients");
        }
        Ok(Dispatch::new(recipients, message))
    }

    async fn deliver(&self, dispatches: Vec<Dispatch>) {
        for dispatch in &dispatches {
            self.enqueue_emails(dispatch).await;
        }
        let recipients: usize = dispatches.iter().map(|d| d.recipients.len()).sum();
        tracing::info!(recipients, "Notification emails queued");
    }

    async fn list_for(&self, account_id: Uuid) -> AppResult<Vec<Notification>> {
        self.uow.notifications().list_for_recipient(account_id).await
    }

    async fn unread_count(&self, account_id: Uuid) -> AppResult<u64> {
        self.uow.notifications().count_unread(account_id).await
    }

    async fn mark_read(&self, account_id: Uuid, notification_id: Uuid) -> AppResult<Notification> {
        self.uow
            .notifications()
            .mark_read(account_id, notification_id)
            .await
    }

    async fn mark_all_read(&self, account_id: Uuid) -> AppResult<u64> {
        self.uow.notifications().mark_all_read(account_id).await
    }
}

/// Store the rows of `dispatches` through `tx`, commit, then queue the emails.
///
/// Any failure before the commit drops `tx`, rolling back both the caller's
/// change and the notifications. No email leaves before the commit succeeds.
pub(crate) async fn commit_with_notifications(
    tx: Box<dyn UnitOfWork>,
    notifier: &dyn NotificationService,
    dispatches: Vec<Dispatch>,
) -> AppResult<()> {
    let rows = rows_of(&dispatches);
    if !rows.is_empty() {
        let stored = tx.notifications().create_many(rows).await?;
        tracing::info!(recipients = stored.len(), "Notifications stored");
    }
    tx.commit().await?;

    if !dispatches.is_empty() {
        notifier.deliver(dispatches).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountProfile, AlumnusProfile, CompanySubscription};
    use crate::infra::{
        AccountRepository, MockAccountRepository, MockNotificationRepository,
        MockSubscriptionRepository, MockUnitOfWork, NotificationRepository,
        SubscriptionRepository,
    };
    use crate::jobs::MockEmailQueue;
    use chrono::Utc;

    fn alumnus(email: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            login_email: email.to_string(),
            password_hash: "hash".to_string(),
            profile_photo_file_path: None,
            profile: AccountProfile::Alumnus(AlumnusProfile {
                first_name: "Rob".to_string(),
                last_name: "Singh".to_string(),
                phone_number: None,
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_prepare_subscribers_resolves_each_alumnus() {
        let company_id = Uuid::new_v4();
        let rob = alumnus("rob@mail.com");
        let ann = alumnus("ann@mail.com");
        let subs: Vec<CompanySubscription> = [&rob, &ann]
            .iter()
            .map(|a| CompanySubscription {
                alumnus_id: a.id,
                company_id,
                subscribed_at: Utc::now(),
            })
            .collect();

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_list_by_company()
            .returning(move |_| Ok(subs.clone()));

        let mut accounts = MockAccountRepository::new();
        let found = vec![rob.clone(), ann.clone()];
        accounts
            .expect_find_many()
            .withf(|ids| ids.len() == 2)
            .returning(move |_| Ok(found.clone()));

        let mut uow = MockUnitOfWork::new();
        uow.expect_subscriptions()
            .return_const(Arc::new(subscriptions) as Arc<dyn SubscriptionRepository>);
        uow.expect_accounts()
            .return_const(Arc::new(accounts) as Arc<dyn AccountRepository>);
        uow.expect_notifications().never();

        let notifier = Notifier::new(Arc::new(uow), Arc::new(MockEmailQueue::new()));
        let dispatch = notifier
            .prepare(Audience::Subscribers(company_id), "New listing!".to_string())
            .await
            .unwrap();

        let rows = dispatch.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.message == "New listing!"));
    }

    #[tokio::test]
    async fn test_deliver_emails_each_recipient() {
        let dispatch = Dispatch::new(
            vec![alumnus("rob@mail.com"), alumnus("ann@mail.com")],
            "New listing!",
        );

        let mut emails = MockEmailQueue::new();
        emails
            .expect_enqueue()
            .withf(|job| job.body == "New listing!")
            .times(2)
            .returning(|_| Ok(()));

        let notifier = Notifier::new(Arc::new(MockUnitOfWork::new()), Arc::new(emails));
        notifier.deliver(vec![dispatch]).await;
    }

    #[tokio::test]
    async fn test_email_failure_is_swallowed() {
        let dispatch = Dispatch::new(vec![alumnus("rob@mail.com")], "Hello");

        let mut emails = MockEmailQueue::new();
        emails
            .expect_enqueue()
            .times(1)
            .returning(|_| Err(AppError::internal("queue down")));

        let notifier = Notifier::new(Arc::new(MockUnitOfWork::new()), Arc::new(emails));
        notifier.deliver(vec![dispatch]).await;
    }

    #[tokio::test]
    async fn test_prepare_company_rejects_alumnus_account() {
        let rob = alumnus("rob@mail.com");
        let rob_id = rob.id;

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(rob.clone())));

        let mut uow = MockUnitOfWork::new();
        uow.expect_accounts()
            .return_const(Arc::new(accounts) as Arc<dyn AccountRepository>);

        let notifier = Notifier::new(Arc::new(uow), Arc::new(MockEmailQueue::new()));
        let result = notifier
            .prepare(Audience::Company(rob_id), "Hi".to_string())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let notifier = Notifier::new(
            Arc::new(MockUnitOfWork::new()),
            Arc::new(MockEmailQueue::new()),
        );
        let result = notifier.prepare(Audience::Admins, "   ".to_string()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mark_read_of_another_accounts_notification_is_not_found() {
        let owner_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();
        let notification_id = Uuid::new_v4();

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_mark_read()
            .returning(move |recipient_id, id| {
                if recipient_id == owner_id && id == notification_id {
                    Ok(Notification {
                        id,
                        recipient_id,
                        message: "Hi".to_string(),
                        created_at: Utc::now(),
                        reviewed_by_user: true,
                    })
                } else {
                    Err(AppError::NotFound)
                }
            });

        let mut uow = MockUnitOfWork::new();
        uow.expect_notifications()
            .return_const(Arc::new(notifications) as Arc<dyn NotificationRepository>);

        let notifier = Notifier::new(Arc::new(uow), Arc::new(MockEmailQueue::new()));
        let result = notifier.mark_read(intruder_id, notification_id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(notifier.mark_read(owner_id, notification_id).await.is_ok());
    }
}
