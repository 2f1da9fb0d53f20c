//! Login, logout and the HTML pages of the admin frontend.

use super::middleware::session_key;
use super::{message, AppState};
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::session::{expired_session_cookie, session_cookie};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Component, Path as FsPath, PathBuf};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> Result<Response> {
    let Json(request) = payload?;
    if let Err(e) = state.auth.authenticate(&request.username, &request.password) {
        tracing::warn!("{}", Message::LoginFailed(request.username.clone()));
        return Err(e);
    }

    state.sessions.insert(&request.username);
    tracing::info!(user = %request.username, "admin logged in");
    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&request.username))]),
        message(Message::LoginSuccessful),
    )
        .into_response())
}

/// Ends the caller's session. Succeeds even without one.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(key) = session_key(&headers) {
        state.sessions.remove(&key);
    }
    (
        AppendHeaders([(header::SET_COOKIE, expired_session_cookie())]),
        message(Message::LogoutSuccessful),
    )
}

pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>> {
    html_page(&state, "login.html").await
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>> {
    html_page(&state, "dashboard.html").await
}

pub async fn labor_management(State(state): State<AppState>) -> Result<Html<String>> {
    html_page(&state, "labor-management.html").await
}

pub async fn materials_management(State(state): State<AppState>) -> Result<Html<String>> {
    html_page(&state, "inventory-management.html").await
}

pub async fn payment_management(State(state): State<AppState>) -> Result<Html<String>> {
    html_page(&state, "payment-management.html").await
}

/// Serves a file below the frontend directory.
pub async fn static_file(State(state): State<AppState>, Path(path): Path<String>) -> Result<Response> {
    let Some(relative) = safe_relative_path(&path) else {
        return Err(AppError::NotFound(Message::PageNotFound(path)));
    };
    let bytes = read_frontend_file(&state.frontend_dir.join(&relative), &path).await?;
    Ok(([(header::CONTENT_TYPE, content_type(&relative))], bytes).into_response())
}

async fn html_page(state: &AppState, name: &str) -> Result<Html<String>> {
    let bytes = read_frontend_file(&state.frontend_dir.join(name), name).await?;
    Ok(Html(String::from_utf8_lossy(&bytes).into_owned()))
}

async fn read_frontend_file(path: &FsPath, requested: &str) -> Result<Vec<u8>> {
    let not_found = || AppError::NotFound(Message::PageNotFound(requested.to_string()));
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::Io(e)),
    }
    Ok(tokio::fs::read(path).await?)
}

/// Keeps only plain path segments; `..`, roots and prefixes are refused.
fn safe_relative_path(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in FsPath::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}

fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_refused() {
        assert_eq!(safe_relative_path("../secrets.json"), None);
        assert_eq!(safe_relative_path("js/../../etc/passwd"), None);
        assert_eq!(safe_relative_path(""), None);
        assert_eq!(safe_relative_path("js/login.js"), Some(PathBuf::from("js/login.js")));
        assert_eq!(safe_relative_path("/login.js"), Some(PathBuf::from("login.js")));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type(FsPath::new("login.js")), "text/javascript; charset=utf-8");
        assert_eq!(content_type(FsPath::new("STYLE.CSS")), "text/css; charset=utf-8");
        assert_eq!(content_type(FsPath::new("blob")), "application/octet-stream");
    }
}
