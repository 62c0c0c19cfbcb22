//! HTTP request handlers.

pub mod account_handler;
pub mod application_handler;
pub mod auth_handler;
pub mod company_handler;
pub mod listing_handler;
pub mod notification_handler;
pub mod saved_handler;
pub mod subscription_handler;

pub use account_handler::account_routes;
pub use application_handler::application_routes;
pub use auth_handler::auth_routes;
pub use company_handler::company_routes;
pub use listing_handler::listing_routes;
pub use notification_handler::notification_routes;
pub use saved_handler::saved_routes;
pub use subscription_handler::subscription_routes;
