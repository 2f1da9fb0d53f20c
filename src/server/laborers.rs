use super::{message, AppState, MessageBody};
use crate::db::laborers::{Laborer, Laborers, NewLaborer};
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

pub async fn create_laborer(
    State(state): State<AppState>,
    payload: Result<Json<NewLaborer>, JsonRejection>,
) -> Result<(StatusCode, Json<Laborer>)> {
    let Json(laborer) = payload?;
    let created = state.with_db(move |conn| Laborers::new(conn).insert(&laborer)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_laborers(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Laborer>>> {
    let Query(page) = query?;
    let page = page.validate()?;
    let laborers = state.with_db(move |conn| Laborers::new(conn).list(page)).await?;
    Ok(Json(laborers))
}

pub async fn search_laborers(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Laborer>>> {
    let Query(SearchQuery { name }) = query?;
    let laborers = state.with_db(move |conn| Laborers::new(conn).search(&name)).await?;
    Ok(Json(laborers))
}

pub async fn get_laborer(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Laborer>> {
    state
        .with_db(move |conn| Laborers::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::LaborerNotFound))
}

pub async fn update_laborer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<NewLaborer>, JsonRejection>,
) -> Result<Json<Laborer>> {
    let Json(laborer) = payload?;
    state
        .with_db(move |conn| Laborers::new(conn).update(id, &laborer))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::LaborerNotFound))
}

pub async fn delete_laborer(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<MessageBody>> {
    if !state.with_db(move |conn| Laborers::new(conn).delete(id)).await? {
        return Err(AppError::NotFound(Message::LaborerNotFound));
    }
    Ok(message(Message::LaborerDeleted))
}
