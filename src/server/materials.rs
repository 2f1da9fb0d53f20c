use super::AppState;
use crate::db::materials::{Material, Materials, NewMaterial};
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::PageParams;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create_material(
    State(state): State<AppState>,
    payload: Result<Json<NewMaterial>, JsonRejection>,
) -> Result<(StatusCode, Json<Material>)> {
    let Json(material) = payload?;
    let created = state.with_db(move |conn| Materials::new(conn).insert(&material)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_materials(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<Material>>> {
    let Query(page) = query?;
    let page = page.validate()?;
    let materials = state.with_db(move |conn| Materials::new(conn).list(page)).await?;
    Ok(Json(materials))
}

pub async fn get_material(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Material>> {
    state
        .with_db(move |conn| Materials::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::MaterialNotFound))
}

pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<NewMaterial>, JsonRejection>,
) -> Result<Json<Material>> {
    let Json(material) = payload?;
    state
        .with_db(move |conn| Materials::new(conn).update(id, &material))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::MaterialNotFound))
}

/// Responds with the record that was removed.
pub async fn delete_material(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Material>> {
    state
        .with_db(move |conn| Materials::new(conn).delete(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::MaterialNotFound))
}
