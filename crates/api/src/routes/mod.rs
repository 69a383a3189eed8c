//! HTTP route handlers.

pub mod advertisements;
pub mod bot_templates;
pub mod health;
pub mod media;
pub mod menu_buttons;
pub mod pin_messages;
pub mod roles;
pub mod stores;
pub mod telegram_users;
pub mod telegram_webhook;
pub mod users;
