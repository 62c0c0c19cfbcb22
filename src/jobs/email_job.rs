//! Email background job.
//!
//! Notification emails are pushed onto an apalis queue and delivered here by
//! the `jobs work` process. Without `SMTP_HOST` the worker logs each email
//! instead of sending it, which keeps development setups self-contained.

use apalis::prelude::Data;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};

use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Optional sender override (defaults to SMTP_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    /// Set custom sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Outbound mail transport shared by the worker.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    pub fn from_settings(settings: &SmtpSettings) -> AppResult<Self> {
        let transport = match &settings.host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| AppError::internal(format!("Invalid SMTP relay: {}", e)))?
                    .port(settings.port);
                if let Some((user, pass)) = settings.credentials() {
                    builder = builder.credentials(Credentials::new(user, pass));
                }
                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            from: settings.from.clone(),
        })
    }

    /// Mailer that only logs, for local runs.
    pub fn log_only(from: impl Into<String>) -> Self {
        Self {
            transport: None,
            from: from.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    fn build_message(&self, job: &EmailJob) -> AppResult<Message> {
        let from: Mailbox = job
            .from
            .as_deref()
            .unwrap_or(&self.from)
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid sender address: {}", e)))?;
        let to: Mailbox = job
            .to
            .parse()
            .map_err(|e| AppError::validation(format!("Invalid recipient address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(job.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(job.body.clone())
            .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))
    }

    /// Send one email, or log it when no SMTP relay is configured.
    pub async fn deliver(&self, job: &EmailJob) -> AppResult<()> {
        let message = self.build_message(job)?;

        let Some(transport) = &self.transport else {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                job.from.as_deref().unwrap_or(&self.from),
                job.to,
                job.subject,
                job.body
            );
            return Ok(());
        };

        transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("SMTP delivery failed: {}", e)))?;
        Ok(())
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob, mailer: Data<Mailer>) -> Result<(), AppError> {
    tracing::info!(to = %job.to, subject = %job.subject, "Processing email job");

    mailer.deliver(&job).await?;

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_uses_default_sender() {
        let mailer = Mailer::log_only("board@mail.com");
        let job = EmailJob::new("rob@mail.com", "Hello", "Body");
        assert!(mailer.build_message(&job).is_ok());
        assert!(!mailer.is_configured());
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mailer = Mailer::log_only("board@mail.com");
        let job = EmailJob::new("not an address", "Hello", "Body");
        assert!(matches!(
            mailer.build_message(&job),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_deliver_without_smtp_only_logs() {
        let mailer = Mailer::log_only("board@mail.com");
        let job = EmailJob::new("rob@mail.com", "Hello", "Body").with_from("hr@sample.com");
        assert!(mailer.deliver(&job).await.is_ok());
    }
}
