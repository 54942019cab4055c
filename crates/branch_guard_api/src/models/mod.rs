//! HTTP response models
//!
//! These types are distinct from domain types and exist only in the HTTP layer.

pub mod response;

pub use response::{HealthCheckResponse, WebhookResponse};
