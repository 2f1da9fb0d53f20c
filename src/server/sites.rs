use super::{message, AppState, MessageBody};
use crate::db::sites::{NewSite, Site, Sites};
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create_site(
    State(state): State<AppState>,
    payload: Result<Json<NewSite>, JsonRejection>,
) -> Result<(StatusCode, Json<Site>)> {
    let Json(site) = payload?;
    let created = state.with_db(move |conn| Sites::new(conn).insert(&site)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_sites(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Site>>> {
    let Query(page) = query?;
    let page = page.validate()?;
    let sites = state.with_db(move |conn| Sites::new(conn).list(page)).await?;
    Ok(Json(sites))
}

pub async fn get_site(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Site>> {
    state
        .with_db(move |conn| Sites::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::SiteNotFound))
}

pub async fn update_site(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<NewSite>, JsonRejection>,
) -> Result<Json<Site>> {
    let Json(site) = payload?;
    state
        .with_db(move |conn| Sites::new(conn).update(id, &site))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::SiteNotFound))
}

/// 409 while materials or payments still reference the site.
pub async fn delete_site(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<MessageBody>> {
    if !state.with_db(move |conn| Sites::new(conn).delete(id)).await? {
        return Err(AppError::NotFound(Message::SiteNotFound));
    }
    Ok(message(Message::SiteDeleted))
}
