use axum::{
    Form,
    extract::{Request, State},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, flash, page_context, pages};
use crate::db::User;

/// Session key holding the authenticated user's id.
pub(crate) const SESSION_USER_KEY: &str = "user_id";

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Guard for the protected routes. Anonymous sessions are sent to the
/// login form instead of the requested page.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    match session.get::<i32>(SESSION_USER_KEY).await {
        Ok(Some(_)) => next.run(request).await,
        _ => Redirect::to("/login").into_response(),
    }
}

/// Resolve the session identity to its user row, if any.
pub(crate) async fn current_user(
    state: &AppState,
    session: &Session,
) -> Result<Option<User>, WebError> {
    let Some(id) = session.get::<i32>(SESSION_USER_KEY).await? else {
        return Ok(None);
    };
    Ok(state.store().get_user(id).await?)
}

/// GET /login
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let ctx = page_context(&state, &session).await?;
    Ok(Html(pages::login_page(&ctx)))
}

/// POST /login
///
/// Credentials are checked against the first stored account only; the
/// username field exists but other rows never authenticate.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, WebError> {
    if form.username.is_empty() || form.password.is_empty() {
        flash::flash(&session, "Invalid input").await?;
        return Ok(Redirect::to("/login"));
    }

    match state
        .store()
        .authenticate(&form.username, &form.password)
        .await?
    {
        Some(user) => {
            session.insert(SESSION_USER_KEY, user.id).await?;
            tracing::info!("User {} logged in", user.id);
            flash::flash(&session, "Login success.").await?;
            Ok(Redirect::to("/"))
        }
        None => {
            flash::flash(&session, "Invalid username or password").await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Redirect, WebError> {
    session.remove::<i32>(SESSION_USER_KEY).await?;
    flash::flash(&session, "Goodbye").await?;
    Ok(Redirect::to("/"))
}
