//! Saved (bookmarked) listing association.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing bookmarked by an alumnus, keyed by `(alumnus_id, job_listing_id)`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SavedJobListing {
    pub alumnus_id: Uuid,
    pub job_listing_id: Uuid,
    pub saved_at: DateTime<Utc>,
}
