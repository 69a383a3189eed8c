//! Repository implementations for database operations.

pub mod advertisement;
pub mod bot_template;
pub mod delivery_job;
pub mod media;
pub mod menu_button;
pub mod pin_message;
pub mod role;
pub mod store;
pub mod telegram_user;
pub mod user;

pub use advertisement::{AdvertisementFilter, AdvertisementRepository};
pub use bot_template::{BotTemplateFilter, BotTemplateRepository};
pub use delivery_job::DeliveryJobRepository;
pub use media::{MediaFilter, MediaRepository, NewMedia};
pub use menu_button::{MenuButtonFilter, MenuButtonRepository};
pub use pin_message::{PinMessageFilter, PinMessageRepository};
pub use role::RoleRepository;
pub use store::{StoreFilter, StoreRepository};
pub use telegram_user::{TelegramUserFilter, TelegramUserRepository};
pub use user::{UserFilter, UserInput, UserRepository};
