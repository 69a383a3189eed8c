//! Entity definitions (database row mappings).

pub mod advertisement;
pub mod bot_template;
pub mod delivery_job;
pub mod media;
pub mod menu_button;
pub mod pin_message;
pub mod store;
pub mod telegram_user;
pub mod user;

pub use advertisement::{AdvertisementEntity, AdvertisementSendEntity};
pub use bot_template::BotTemplateEntity;
pub use delivery_job::{DeliveryJobEntity, JobPayloadRow};
pub use media::MediaEntity;
pub use menu_button::MenuButtonEntity;
pub use pin_message::PinMessageEntity;
pub use store::StoreEntity;
pub use telegram_user::TelegramUserEntity;
pub use user::{RoleEntity, RoleUsageEntity, UserEntity, UserRoleEntity};
