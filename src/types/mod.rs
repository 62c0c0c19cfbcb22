//! Shared types used by handlers: pagination and response envelopes.

mod pagination;
mod response;

pub use pagination::{ListingPage, Paginated, PaginationMeta, PaginationParams};
pub use response::{MessageResponse, NoContent};
