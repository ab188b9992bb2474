//! journal-cli command handlers.
//!
//! Each handler performs one user action against the gateway and prints the
//! result to stdout. Errors come back as display-ready strings.

use std::path::Path;

use reqwest::StatusCode;
use serde_json::Value;

use journal_client::api::types::{
    LoginRequest, NotificationQuery, NotificationStatus, PublicVolumeQuery, VolumeQuery,
};
use journal_client::api::{auth, files, notifications, volumes};
use journal_client::storage::preferences::{parse_roles, pick_active_role, Language, Role};
use journal_client::ApiError;

use crate::state::AppState;

/// User-facing message for a failed login.
pub fn login_error_message(err: &ApiError) -> String {
    if err.is_unauthorized() {
        return "Login failed: invalid username or password".to_string();
    }
    if err.is_pending_approval() {
        return "Login failed: account is pending approval by an editor".to_string();
    }
    if err.status() == Some(StatusCode::FORBIDDEN) {
        return "Login failed: access denied".to_string();
    }
    if matches!(err, ApiError::Transport(_)) {
        return format!("Login failed: could not reach the server ({})", err);
    }
    format!("Login failed: {}", err)
}

/// Log in and store the issued tokens.
///
/// Also aligns the stored active role with the roles the server grants.
pub async fn login(state: &AppState, username: String, password: String) -> Result<(), String> {
    log::info!("Logging in as {}", username);

    let credentials = LoginRequest { username, password };
    let response = auth::login(&state.api, &credentials)
        .await
        .map_err(|e| login_error_message(&e))?
        .ok_or_else(|| "Login failed: server returned no tokens".to_string())?;
    state.api.set_tokens(Some(response.into_tokens())).await;

    match auth::my_roles(&state.api).await {
        Ok(granted) => {
            let available = parse_roles(&granted.roles);
            let role = pick_active_role(state.preferences.stored_role(), &available);
            if let Err(e) = state.preferences.set_active_role(role) {
                log::warn!("Failed to store active role: {}", e);
            }
            println!("Logged in (active role: {})", role);
        }
        Err(e) => {
            log::warn!("Logged in but failed to fetch roles: {}", e);
            println!("Logged in");
        }
    }
    Ok(())
}

/// Clear the stored session. Purely local.
pub async fn logout(state: &AppState) -> Result<(), String> {
    state.api.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn me(state: &AppState) -> Result<(), String> {
    require_session(state).await?;
    let me = auth::me(&state.api)
        .await
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    println!("id:       {}", me.id);
    println!("username: {}", me.username);
    if let Some(name) = me.full_name.as_deref().filter(|n| !n.is_empty()) {
        println!("name:     {}", name);
    }
    if let Some(email) = me.email.as_deref() {
        println!("email:    {}", email);
    }
    println!("role:     {}", me.role);
    Ok(())
}

pub async fn roles(state: &AppState) -> Result<(), String> {
    require_session(state).await?;
    let granted = auth::my_roles(&state.api)
        .await
        .map_err(|e| format!("Failed to load roles: {}", e))?;

    let available = parse_roles(&granted.roles);
    let active = pick_active_role(state.preferences.stored_role(), &available);
    for role in available {
        let marker = if role == active { "*" } else { " " };
        println!("{} {}", marker, role);
    }
    Ok(())
}

pub async fn list_notifications(
    state: &AppState,
    unread_only: bool,
    limit: Option<u32>,
) -> Result<(), String> {
    require_session(state).await?;
    let filters = NotificationQuery {
        status: unread_only.then_some(NotificationStatus::Unread),
        limit,
        offset: None,
    };
    let items = notifications::list(&state.api, &filters)
        .await
        .map_err(|e| format!("Failed to load notifications: {}", e))?;

    if items.is_empty() {
        println!("No notifications");
        return Ok(());
    }
    for n in items {
        let marker = match n.status {
            NotificationStatus::Unread => "*",
            NotificationStatus::Read => " ",
        };
        println!("{} {:>6}  {}  {}", marker, n.id, n.created_at, n.title);
        if let Some(message) = n.message.as_deref().filter(|m| !m.is_empty()) {
            println!("          {}", message);
        }
    }
    Ok(())
}

pub async fn read_notification(state: &AppState, id: i64) -> Result<(), String> {
    require_session(state).await?;
    notifications::mark_read(&state.api, id)
        .await
        .map_err(|e| format!("Failed to mark notification {} as read: {}", id, e))?;
    println!("Notification {} marked as read", id);
    Ok(())
}

pub async fn upload(state: &AppState, path: &Path) -> Result<(), String> {
    require_session(state).await?;
    log::info!("Uploading {}", path.display());

    let descriptor = files::upload_path(&state.api, path)
        .await
        .map_err(|e| format!("Upload failed: {}", e))?
        .ok_or_else(|| "Upload failed: server returned no file descriptor".to_string())?;

    println!("id:   {}", descriptor.id);
    println!("name: {}", descriptor.original_name);
    println!("type: {}", descriptor.content_type);
    println!("size: {} bytes", descriptor.size_bytes);
    if let Some(url) = files::to_api_files_url(Some(&descriptor.url), state.origin.as_deref()) {
        println!("url:  {}", url);
    }
    Ok(())
}

pub async fn list_volumes(state: &AppState, public: bool, year: Option<i32>) -> Result<(), String> {
    let result: Result<Value, ApiError> = if public {
        let filters = PublicVolumeQuery {
            year,
            ..Default::default()
        };
        volumes::list_public(&state.api, &filters).await
    } else {
        require_session(state).await?;
        let filters = VolumeQuery {
            year,
            ..Default::default()
        };
        volumes::list(&state.api, &filters).await
    };

    let list = result.map_err(|e| format!("Failed to load volumes: {}", e))?;
    let pretty = serde_json::to_string_pretty(&list)
        .map_err(|e| format!("Failed to format volumes: {}", e))?;
    println!("{}", pretty);
    Ok(())
}

/// Update any given preference, then print all of them.
pub fn prefs(
    state: &AppState,
    role: Option<Role>,
    low_vision: Option<bool>,
    language: Option<Language>,
) -> Result<(), String> {
    let prefs = &state.preferences;
    if let Some(role) = role {
        prefs
            .set_active_role(role)
            .map_err(|e| format!("Failed to store role: {}", e))?;
    }
    if let Some(enabled) = low_vision {
        prefs
            .set_low_vision(enabled)
            .map_err(|e| format!("Failed to store low-vision mode: {}", e))?;
    }
    if let Some(language) = language {
        prefs
            .set_language(language)
            .map_err(|e| format!("Failed to store language: {}", e))?;
    }

    println!("role:       {}", prefs.active_role());
    println!("low-vision: {}", if prefs.low_vision() { "on" } else { "off" });
    println!("language:   {}", prefs.language());
    Ok(())
}

async fn require_session(state: &AppState) -> Result<(), String> {
    if state.api.is_authenticated().await {
        Ok(())
    } else {
        Err("Not logged in. Run `journal-cli login` first.".to_string())
    }
}
