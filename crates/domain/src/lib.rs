//! Domain layer for the bot admin backend.
//!
//! This crate contains:
//! - Domain models and request/response payloads for every managed resource
//! - Telegram Bot API update and keyboard types
//! - Pure business rules (frequency capping, template rendering, update
//!   classification, menu tree rules)

pub mod models;
pub mod services;
