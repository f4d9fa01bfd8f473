//! Integration tests for the web flows, driven through the router with
//! a manual session-cookie jar.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;
use watchlist::config::Config;
use watchlist::web::AppState;

async fn spawn_app() -> (Arc<AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!("watchlist-web-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = watchlist::web::create_app_state(config)
        .await
        .expect("failed to create app state");

    // One credentialed user and one movie, like a freshly bootstrapped
    // deployment.
    let security = state.config().security.clone();
    state
        .store()
        .upsert_admin("test", "123", &security)
        .await
        .expect("failed to seed user");
    let user = state
        .store()
        .first_user()
        .await
        .expect("failed to fetch seeded user")
        .expect("missing seeded user");
    state
        .store()
        .update_user_name(user.id, "Test")
        .await
        .expect("failed to rename seeded user");
    state
        .store()
        .add_movie("Test Movie Title", "2019")
        .await
        .expect("failed to seed movie");

    let router = watchlist::web::router(state.clone());
    (state, router)
}

/// Session cookie carried between requests.
#[derive(Default)]
struct Jar(Option<String>);

async fn send(
    app: &Router,
    jar: &mut Jar,
    method: &str,
    uri: &str,
    form: Option<&str>,
) -> axum::http::Response<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = jar.0.as_deref() {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match form {
        Some(body) => builder
            .header(
                header::CONTENT_TYPE,
                mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
            )
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();

    if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
        let pair = set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        jar.0 = Some(pair);
    }

    response
}

async fn body_text(response: axum::http::Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get_page(app: &Router, jar: &mut Jar, uri: &str) -> String {
    let response = send(app, jar, "GET", uri, None).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    body_text(response).await
}

/// POST a form and follow redirects to the final page, like a browser.
async fn post_and_follow(app: &Router, jar: &mut Jar, uri: &str, form: &str) -> String {
    let mut response = send(app, jar, "POST", uri, Some(form)).await;

    while response.status().is_redirection() {
        let location = response
            .headers()
            .get(header::LOCATION)
            .expect("redirect without location")
            .to_str()
            .unwrap()
            .to_string();
        response = send(app, jar, "GET", &location, None).await;
    }

    assert_eq!(response.status(), StatusCode::OK);
    body_text(response).await
}

async fn login(app: &Router, jar: &mut Jar) -> String {
    post_and_follow(app, jar, "/login", "username=test&password=123").await
}

#[tokio::test]
async fn test_404_page() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();

    let response = send(&app, &mut jar, "GET", "/nothing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let data = body_text(response).await;
    assert!(data.contains("Page Not Found - 404"));
    assert!(data.contains("Go Back"));
}

#[tokio::test]
async fn test_400_page_for_bad_movie_id() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let response = send(&app, &mut jar, "GET", "/movie/edit/not-a-number", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let data = body_text(response).await;
    assert!(data.contains("Bad Request - 400"));
}

#[tokio::test]
async fn test_index_page() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();

    let data = get_page(&app, &mut jar, "/").await;
    assert!(data.contains("Test's Watchlist"));
    assert!(data.contains("Test Movie Title"));
    assert!(data.contains("2019"));
}

#[tokio::test]
async fn test_create_item() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let data = post_and_follow(&app, &mut jar, "/", "title=New+Movie&year=2018").await;
    assert!(data.contains("Item created"));
    assert!(data.contains("New Movie"));

    let data = post_and_follow(&app, &mut jar, "/", "title=&year=2018").await;
    assert!(!data.contains("Item created"));
    assert!(data.contains("Invalid input"));

    let data = post_and_follow(&app, &mut jar, "/", "title=New+Movie&year=").await;
    assert!(!data.contains("Item created"));
    assert!(data.contains("Invalid input"));
}

#[tokio::test]
async fn test_create_rejects_oversized_fields() {
    let (state, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let long_title = "a".repeat(61);
    let data = post_and_follow(
        &app,
        &mut jar,
        "/",
        &format!("title={long_title}&year=2018"),
    )
    .await;
    assert!(data.contains("Invalid input"));

    let data = post_and_follow(&app, &mut jar, "/", "title=Okay&year=20199").await;
    assert!(data.contains("Invalid input"));

    // Only the seeded movie is present.
    assert_eq!(state.store().count_movies().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_requires_login() {
    let (state, app) = spawn_app().await;
    let mut jar = Jar::default();

    let data = post_and_follow(&app, &mut jar, "/", "title=Sneaky&year=2018").await;
    assert!(data.contains("Not authenticated"));
    assert!(!data.contains("Sneaky"));
    assert_eq!(state.store().count_movies().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_item() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let data = get_page(&app, &mut jar, "/movie/edit/1").await;
    assert!(data.contains("Edit item"));
    assert!(data.contains("Test Movie Title"));
    assert!(data.contains("2019"));

    let data = post_and_follow(
        &app,
        &mut jar,
        "/movie/edit/1",
        "title=New+Movie+Edited&year=2019",
    )
    .await;
    assert!(data.contains("Item updated"));
    assert!(data.contains("New Movie Edited"));

    let data = post_and_follow(&app, &mut jar, "/movie/edit/1", "title=&year=2019").await;
    assert!(!data.contains("Item updated"));
    assert!(data.contains("Invalid input"));

    let data = post_and_follow(
        &app,
        &mut jar,
        "/movie/edit/1",
        "title=New+Movie+Edited+Again&year=",
    )
    .await;
    assert!(!data.contains("Item updated"));
    assert!(!data.contains("New Movie Edited Again"));
    assert!(data.contains("Invalid input"));

    // Rejected edits leave the previous values in place.
    let data = get_page(&app, &mut jar, "/movie/edit/1").await;
    assert!(data.contains("New Movie Edited"));
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let response = send(&app, &mut jar, "GET", "/movie/edit/99", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        &mut jar,
        "POST",
        "/movie/edit/99",
        Some("title=Ghost&year=2020"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_item() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let data = post_and_follow(&app, &mut jar, "/movie/delete/1", "").await;
    assert!(data.contains("Item deleted"));
    assert!(!data.contains("Test Movie Title"));

    let response = send(&app, &mut jar, "POST", "/movie/delete/1", Some("")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_protect() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();

    let data = get_page(&app, &mut jar, "/").await;
    assert!(!data.contains("Logout"));
    assert!(!data.contains("Settings"));
    assert!(!data.contains("Edit"));
    assert!(!data.contains("Delete"));
    assert!(!data.contains("<form method=\"POST\">"));

    // Guarded routes bounce anonymous sessions to the login form.
    for uri in ["/settings", "/movie/edit/1", "/logout"] {
        let response = send(&app, &mut jar, "GET", uri, None).await;
        assert!(response.status().is_redirection(), "GET {uri}");
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    let response = send(&app, &mut jar, "POST", "/movie/delete/1", Some("")).await;
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_login() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();

    let data = login(&app, &mut jar).await;
    assert!(data.contains("Login success."));
    assert!(data.contains("Logout"));
    assert!(data.contains("Settings"));
    assert!(data.contains("Edit"));
    assert!(data.contains("Delete"));
    assert!(data.contains("<form method=\"POST\">"));
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let (_, app) = spawn_app().await;

    let mut jar = Jar::default();
    let data = post_and_follow(&app, &mut jar, "/login", "username=test&password=456").await;
    assert!(!data.contains("Login success."));
    assert!(data.contains("Invalid username or password"));

    let mut jar = Jar::default();
    let data = post_and_follow(&app, &mut jar, "/login", "username=test1&password=123").await;
    assert!(!data.contains("Login success."));
    assert!(data.contains("Invalid username or password"));

    let mut jar = Jar::default();
    let data = post_and_follow(&app, &mut jar, "/login", "username=&password=123").await;
    assert!(!data.contains("Login success."));
    assert!(data.contains("Invalid input"));
}

#[tokio::test]
async fn test_login_checks_first_user_only() {
    let (state, app) = spawn_app().await;

    // A second credentialed row never authenticates; login always
    // resolves against the first user.
    let hash = watchlist::db::repositories::user::hash_password(
        "hunter2",
        &state.config().security,
    )
    .unwrap();
    let second = watchlist::entities::users::ActiveModel {
        name: sea_orm::Set("Second".to_string()),
        username: sea_orm::Set(Some("second".to_string())),
        password_hash: sea_orm::Set(Some(hash)),
        ..Default::default()
    };
    use sea_orm::EntityTrait;
    watchlist::entities::prelude::Users::insert(second)
        .exec(&state.store().conn)
        .await
        .unwrap();

    let mut jar = Jar::default();
    let data = post_and_follow(&app, &mut jar, "/login", "username=second&password=hunter2").await;
    assert!(!data.contains("Login success."));
    assert!(data.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_logout() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let response = send(&app, &mut jar, "GET", "/logout", None).await;
    assert!(response.status().is_redirection());

    let data = get_page(&app, &mut jar, "/").await;
    assert!(data.contains("Goodbye"));
    assert!(!data.contains("Logout"));
    assert!(!data.contains("Settings"));
    assert!(!data.contains("<form method=\"POST\">"));
}

#[tokio::test]
async fn test_settings() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();
    login(&app, &mut jar).await;

    let data = get_page(&app, &mut jar, "/settings").await;
    assert!(data.contains("Your name"));
    assert!(data.contains("Settings"));

    let data = post_and_follow(&app, &mut jar, "/settings", "name=zjf").await;
    assert!(data.contains("Settings updated!"));
    assert!(data.contains("zjf's Watchlist"));

    let data = post_and_follow(&app, &mut jar, "/settings", "name=").await;
    assert!(data.contains("Invalid input"));
    assert!(!data.contains("Settings updated!"));

    let long_name = "a".repeat(21);
    let data = post_and_follow(&app, &mut jar, "/settings", &format!("name={long_name}")).await;
    assert!(data.contains("Invalid input"));
}

#[tokio::test]
async fn test_flash_messages_show_once() {
    let (_, app) = spawn_app().await;
    let mut jar = Jar::default();

    let data = login(&app, &mut jar).await;
    assert!(data.contains("Login success."));

    // Drained on first render.
    let data = get_page(&app, &mut jar, "/").await;
    assert!(!data.contains("Login success."));
}
