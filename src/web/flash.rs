//! One-shot notices carried in the session and drained at render time.

use tower_sessions::Session;

use super::WebError;

const FLASH_KEY: &str = "_flashes";

/// Queue a message for the next rendered page.
pub async fn flash(session: &Session, message: &str) -> Result<(), WebError> {
    let mut messages: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(message.to_string());
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// Remove and return every queued message.
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, WebError> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
