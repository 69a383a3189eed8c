//! Domain models.

pub mod advertisement;
pub mod bot_template;
pub mod common;
pub mod delivery_job;
pub mod media;
pub mod menu_button;
pub mod pin_message;
pub mod role;
pub mod store;
pub mod telegram;
pub mod telegram_user;
pub mod user;

pub use advertisement::{
    Advertisement, AdvertisementQuery, AdvertisementRequest, AdvertisementSend,
    AdvertisementSortField, AdvertisementStatus, BulkUpdateAdvertisementsRequest,
    SendHistoryQuery, DEFAULT_FREQUENCY_CAP_MINUTES,
};
pub use bot_template::{BotTemplate, BotTemplateQuery, BotTemplateRequest};
pub use common::{BulkActionResponse, BulkIdsRequest, MessageResponse};
pub use delivery_job::{DeliveryJob, JobPayload, DELIVERY_QUEUE};
pub use media::{MediaItem, MediaKind, MediaQuery, MediaResponse};
pub use menu_button::{MenuButton, MenuButtonQuery, MenuButtonRequest, MenuButtonType, MenuTreeNode};
pub use pin_message::{PinMessage, PinMessageQuery, PinMessageRequest};
pub use role::{Role, RoleQuery, RoleRequest, RoleWithUsage, SUPER_ADMIN_ROLE};
pub use store::{BulkUpdateStoresRequest, Store, StoreQuery, StoreRequest, StoreSortField};
pub use telegram_user::{
    TelegramUser, TelegramUserProfile, TelegramUserQuery, UpdateTelegramUserRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserQuery, UserResponse};
