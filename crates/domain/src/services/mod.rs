//! Business rules shared by the API and background jobs.

pub mod bot_api;
pub mod frequency_cap;
pub mod job_scan;
pub mod menu;
pub mod template;
pub mod update_routing;

pub use bot_api::{send_media_with_text, BotApi, BotApiError, BotCall, MockBotApi};
pub use frequency_cap::{is_send_allowed, window_start};
pub use job_scan::{payload_references_advertisement, PAYLOAD_LIKE_PATTERN};
pub use menu::{build_tree, ensure_deletable, ensure_valid_parent, MenuRuleError};
pub use template::{render, TemplateContext};
pub use update_routing::{classify, parse_command, CallbackAction, Command, UpdateKind};
