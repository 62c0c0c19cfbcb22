//! Background jobs.
//!
//! Jobs are stored in PostgreSQL through apalis and processed by the
//! `jobs work` command.

mod email_job;
mod queue;

pub use email_job::{email_job_handler, EmailJob, Mailer};
pub use queue::{ApalisEmailQueue, EmailQueue};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockEmailQueue;
