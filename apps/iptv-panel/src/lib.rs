pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod notifier;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    routing::{get, post},
};
use iptv_db::Store;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use auth::AuthService;
use config::PanelConfig;
use notifier::Notify;

/// Shared by every handler for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Arc<AuthService>,
    pub notifier: Arc<dyn Notify>,
}

impl AppState {
    pub fn new(store: Store, auth: AuthService, notifier: Arc<dyn Notify>) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
            notifier,
        }
    }

    /// Wires the store together with the signing key and notifier described by `config`.
    pub fn from_config(store: Store, config: &PanelConfig) -> anyhow::Result<Self> {
        let secret = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "JWT_SECRET is not set; using a random key, tokens will not survive a restart"
                );
                rand::random::<[u8; 32]>().to_vec()
            }
        };
        let auth = AuthService::new(&secret, config.bcrypt_cost);
        let notifier = notifier::from_config(config.telegram.as_ref())?;
        Ok(Self::new(store, auth, notifier))
    }
}

pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth::require_auth);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Account administration
        .route("/admin/addUser", post(handlers::admin::add_user))
        .route("/admin/userDetails/{user_id}", get(handlers::admin::user_details))
        .route("/admin/banUser", post(handlers::admin::ban_user))
        .route("/admin/unbanUser", post(handlers::admin::unban_user))
        .route("/admin/renewUser", post(handlers::admin::renew_user))
        .route("/admin/login", post(handlers::admin::login))
        .route("/reseller/addCredit", post(handlers::reseller::add_credit))
        .route("/reseller/details/{reseller_id}", get(handlers::reseller::reseller_details))
        // API
        .route(
            "/api/users",
            post(handlers::users::register_user)
                .merge(get(handlers::users::list_users).layer(auth.clone())),
        )
        .route(
            "/api/channels",
            get(handlers::catalog::list_channels)
                .post(handlers::catalog::create_channel)
                .layer(auth.clone()),
        )
        .route(
            "/api/vod",
            get(handlers::catalog::list_vod)
                .post(handlers::catalog::create_vod)
                .layer(auth.clone()),
        )
        .route(
            "/api/series",
            get(handlers::catalog::list_series)
                .post(handlers::catalog::create_series)
                .layer(auth.clone()),
        )
        .route(
            "/api/episodes",
            get(handlers::catalog::list_episodes)
                .post(handlers::catalog::create_episode)
                .layer(auth),
        )
        // Login page and panel script
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}
