//! Background job scheduler and job implementations.

mod advertisement_broadcast;
mod delivery_worker;
mod pool_metrics;
mod rate_limit_prune;
mod scheduler;

pub use advertisement_broadcast::AdvertisementBroadcastJob;
pub use delivery_worker::DeliveryWorkerJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_prune::RateLimitPruneJob;
pub use scheduler::{Job, JobError, JobFrequency, JobScheduler};
