use axum::{
    Form,
    extract::{Path, State, rejection::PathRejection},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::SESSION_USER_KEY;
use super::{AppState, WebError, flash, forms, page_context, pages};

#[derive(Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, WebError> {
    let ctx = page_context(&state, &session).await?;
    let movies = state.store().list_movies().await?;
    Ok(Html(pages::index_page(&ctx, &movies)))
}

/// POST /
///
/// The index route serves anonymous viewing too, so the auth check
/// lives here instead of the route guard.
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, WebError> {
    if session.get::<i32>(SESSION_USER_KEY).await?.is_none() {
        flash::flash(&session, "Not authenticated").await?;
        return Ok(Redirect::to("/"));
    }

    if !forms::movie_fields_valid(&form.title, &form.year) {
        flash::flash(&session, "Invalid input").await?;
        return Ok(Redirect::to("/"));
    }

    state.store().add_movie(&form.title, &form.year).await?;
    flash::flash(&session, "Item created").await?;
    Ok(Redirect::to("/"))
}

/// A movie id that did not parse as an integer renders the 400 page.
fn movie_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, WebError> {
    let Path(id) = id.map_err(|e| WebError::BadRequest(e.to_string()))?;
    Ok(id)
}

/// GET /movie/edit/{id}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Html<String>, WebError> {
    let id = movie_id(id)?;
    let movie = state
        .store()
        .get_movie(id)
        .await?
        .ok_or_else(|| WebError::not_found("Movie", id))?;

    let ctx = page_context(&state, &session).await?;
    Ok(Html(pages::edit_page(&ctx, &movie)))
}

/// POST /movie/edit/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    session: Session,
    id: Result<Path<i32>, PathRejection>,
    Form(form): Form<MovieForm>,
) -> Result<Redirect, WebError> {
    let id = movie_id(id)?;
    state
        .store()
        .get_movie(id)
        .await?
        .ok_or_else(|| WebError::not_found("Movie", id))?;

    if !forms::movie_fields_valid(&form.title, &form.year) {
        flash::flash(&session, "Invalid input").await?;
        return Ok(Redirect::to(&format!("/movie/edit/{id}")));
    }

    state.store().update_movie(id, &form.title, &form.year).await?;
    flash::flash(&session, "Item updated").await?;
    Ok(Redirect::to("/"))
}

/// POST /movie/delete/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Redirect, WebError> {
    let id = movie_id(id)?;
    if !state.store().remove_movie(id).await? {
        return Err(WebError::not_found("Movie", id));
    }

    flash::flash(&session, "Item deleted").await?;
    Ok(Redirect::to("/"))
}
