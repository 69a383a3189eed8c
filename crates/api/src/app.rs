use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::BotApi;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    advertisements, bot_templates, health, media, menu_buttons, pin_messages, roles, stores,
    telegram_users, telegram_webhook, users,
};
use crate::services::MediaStorage;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub bot: Arc<dyn BotApi>,
    pub storage: MediaStorage,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, bot: Arc<dyn BotApi>) -> Self {
        // None when rate_limit_per_minute is 0
        let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);
        let storage = MediaStorage::new(config.media.storage_dir.clone());

        Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
            bot,
            storage,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool, bot: Arc<dyn BotApi>) -> Router {
    create_router(AppState::new(config, pool, bot))
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let upload_limit = DefaultBodyLimit::max(config.media.max_upload_bytes + MULTIPART_OVERHEAD_BYTES);

    // Admin panel routes, rate limited per client address
    let admin_routes = Router::new()
        // Stores
        .route("/api/stores", get(stores::list_stores).post(stores::create_store))
        .route(
            "/api/stores/:id",
            get(stores::get_store)
                .put(stores::update_store)
                .delete(stores::delete_store),
        )
        .route("/api/stores/bulk-update", post(stores::bulk_update_stores))
        .route("/api/stores/bulk-delete", post(stores::bulk_delete_stores))
        // Advertisements
        .route(
            "/api/advertisements",
            get(advertisements::list_advertisements).post(advertisements::create_advertisement),
        )
        .route(
            "/api/advertisements/:id",
            get(advertisements::get_advertisement)
                .put(advertisements::update_advertisement)
                .delete(advertisements::delete_advertisement),
        )
        .route("/api/advertisements/:id/sends", get(advertisements::list_sends))
        .route(
            "/api/advertisements/bulk-update",
            post(advertisements::bulk_update_advertisements),
        )
        .route(
            "/api/advertisements/bulk-delete",
            post(advertisements::bulk_delete_advertisements),
        )
        // Pin messages
        .route(
            "/api/pin-messages",
            get(pin_messages::list_pin_messages).post(pin_messages::create_pin_message),
        )
        .route(
            "/api/pin-messages/:id",
            get(pin_messages::get_pin_message)
                .put(pin_messages::update_pin_message)
                .delete(pin_messages::delete_pin_message),
        )
        .route(
            "/api/pin-messages/bulk-delete",
            post(pin_messages::bulk_delete_pin_messages),
        )
        // Menu buttons
        .route(
            "/api/menu-buttons",
            get(menu_buttons::list_menu_buttons).post(menu_buttons::create_menu_button),
        )
        .route("/api/menu-buttons/tree", get(menu_buttons::menu_tree))
        .route(
            "/api/menu-buttons/:id",
            get(menu_buttons::get_menu_button)
                .put(menu_buttons::update_menu_button)
                .delete(menu_buttons::delete_menu_button),
        )
        .route(
            "/api/menu-buttons/bulk-delete",
            post(menu_buttons::bulk_delete_menu_buttons),
        )
        // Media library
        .route(
            "/api/media",
            get(media::list_media).post(media::upload_media).layer(upload_limit),
        )
        .route(
            "/api/media/:id",
            get(media::get_media).delete(media::delete_media),
        )
        .route("/api/media/bulk-delete", post(media::bulk_delete_media))
        // Bot templates
        .route(
            "/api/bot-templates",
            get(bot_templates::list_bot_templates).post(bot_templates::create_bot_template),
        )
        .route(
            "/api/bot-templates/:id",
            get(bot_templates::get_bot_template)
                .put(bot_templates::update_bot_template)
                .delete(bot_templates::delete_bot_template),
        )
        .route(
            "/api/bot-templates/:id/activate",
            post(bot_templates::activate_bot_template),
        )
        .route(
            "/api/bot-templates/bulk-delete",
            post(bot_templates::bulk_delete_bot_templates),
        )
        // Admin users and roles
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/users/bulk-delete", post(users::bulk_delete_users))
        .route("/api/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/api/roles/:id",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        // Bot users
        .route("/api/telegram-users", get(telegram_users::list_telegram_users))
        .route(
            "/api/telegram-users/:id",
            get(telegram_users::get_telegram_user).put(telegram_users::update_telegram_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Telegram webhook; authenticated by the secret token header, not rate limited
    let webhook_routes = Router::new().route(
        "/api/telegram/webhook",
        post(telegram_webhook::receive_update),
    );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .nest_service("/media-files", ServeDir::new(state.storage.root()));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
