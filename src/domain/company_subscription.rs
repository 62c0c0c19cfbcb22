//! Alumnus subscription to a company's new listings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Subscription row, keyed by `(alumnus_id, company_id)`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CompanySubscription {
    pub alumnus_id: Uuid,
    pub company_id: Uuid,
    pub subscribed_at: DateTime<Utc>,
}

/// Result of a bulk subscribe request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubscribeOutcome {
    /// Companies newly subscribed to
    pub added: Vec<Uuid>,
    /// Companies the alumnus was already subscribed to
    pub already: Vec<Uuid>,
}
