use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;
use tower_sessions::Session;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod flash;
mod forms;
mod movies;
mod pages;
mod settings;

pub use error::WebError;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState { shared }))
}

/// Build the template context every rendered page needs: the watchlist
/// owner (always the first user row, logged in or not), pending flash
/// notices and the session's auth state.
pub(crate) async fn page_context(
    state: &AppState,
    session: &Session,
) -> Result<pages::PageContext, WebError> {
    let owner = state.store().first_user().await?.map(|u| u.name);
    let logged_in = session.get::<i32>(auth::SESSION_USER_KEY).await?.is_some();
    let flashes = flash::take_flashes(session).await?;

    Ok(pages::PageContext {
        owner,
        flashes,
        logged_in,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config().server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config().server.session_minutes,
        )));

    let protected_routes = Router::new()
        .route("/logout", get(auth::logout))
        .route(
            "/settings",
            get(settings::settings_form).post(settings::update),
        )
        .route(
            "/movie/edit/{id}",
            get(movies::edit_form).post(movies::update),
        )
        .route("/movie/delete/{id}", post(movies::delete))
        .route_layer(middleware::from_fn(auth::require_login));

    Router::new()
        .merge(protected_routes)
        .route("/", get(movies::index).post(movies::create))
        .route("/login", get(auth::login_form).post(auth::login))
        .fallback(error::page_not_found)
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
