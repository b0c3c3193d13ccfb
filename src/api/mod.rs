use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::evidence::EvidenceStore;
use crate::state::SharedState;

pub mod auth;
mod error;
mod inmates;
mod types;
mod uploads;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn evidence(&self) -> &Arc<EvidenceStore> {
        &self.shared.evidence
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState { shared }))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (secure_cookies, timeout_minutes) = {
        let config = state.config().read().await;
        (
            config.server.secure_cookies,
            config.server.session_timeout_minutes,
        )
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            timeout_minutes,
        )));

    let protected_routes = Router::new()
        .route(
            "/dashboard",
            get(inmates::list_inmates).post(inmates::create_inmate),
        )
        .route("/search", get(inmates::search_inmates))
        .route(
            "/inmate/edit/{id}",
            get(inmates::edit_form).post(inmates::update_inmate),
        )
        .route("/inmate/delete/{id}", post(inmates::delete_inmate))
        .route("/uploads/{filename}", get(uploads::serve_upload))
        .route_layer(middleware::from_fn(auth::auth_middleware));

    Router::new()
        .merge(protected_routes)
        .route("/", get(auth::index))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", get(auth::logout))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
