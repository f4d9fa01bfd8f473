use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{AppState, WebError, auth, flash, forms, page_context, pages};

#[derive(Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub name: String,
}

/// GET /settings
pub async fn settings_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let user = auth::current_user(&state, &session)
        .await?
        .ok_or_else(|| WebError::internal("Session user no longer exists"))?;

    let ctx = page_context(&state, &session).await?;
    Ok(Html(pages::settings_page(&ctx, &user.name)))
}

/// POST /settings
pub async fn update(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> Result<Redirect, WebError> {
    if !forms::name_valid(&form.name) {
        flash::flash(&session, "Invalid input").await?;
        return Ok(Redirect::to("/settings"));
    }

    let user = auth::current_user(&state, &session)
        .await?
        .ok_or_else(|| WebError::internal("Session user no longer exists"))?;

    state.store().update_user_name(user.id, &form.name).await?;
    flash::flash(&session, "Settings updated!").await?;
    Ok(Redirect::to("/"))
}
