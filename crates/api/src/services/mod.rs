//! Application services.

pub mod advertisement_delivery;
pub mod advertisements;
pub mod bot;
pub mod delivery_queue;
pub mod media_storage;
pub mod telegram_client;
pub mod users;

pub use advertisement_delivery::AdvertisementDeliverer;
pub use advertisements::AdvertisementService;
pub use delivery_queue::DeliveryQueue;
pub use media_storage::MediaStorage;
pub use telegram_client::TelegramClient;
pub use users::UserService;
