//! Custom Axum extractors.

pub mod validated;
pub mod webhook_secret;

pub use validated::{ValidatedJson, ValidatedQuery};
pub use webhook_secret::{VerifiedWebhook, SECRET_TOKEN_HEADER};
