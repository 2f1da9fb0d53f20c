use super::{message, AppState, MessageBody};
use crate::db::attendance::{Attendance, AttendanceRecords, AttendanceUpdate, NewAttendance};
use crate::db::laborers::Laborers;
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::{Page, PageParams};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn record_attendance(
    State(state): State<AppState>,
    Path(laborer_id): Path<i64>,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> Result<(StatusCode, Json<Attendance>)> {
    let Json(record) = payload?;
    tracing::info!("{}", Message::AttendanceReceived(laborer_id));
    let created = state
        .with_db(move |conn| AttendanceRecords::new(conn).insert(laborer_id, &record))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// All records of one laborer; 404 when the laborer does not exist.
pub async fn attendance_history(State(state): State<AppState>, Path(laborer_id): Path<i64>) -> Result<Json<Vec<Attendance>>> {
    let records = state
        .with_db(move |conn| {
            if !Laborers::new(conn).exists(laborer_id)? {
                return Err(AppError::NotFound(Message::LaborerNotFound));
            }
            AttendanceRecords::new(conn).list_by_laborer(laborer_id)
        })
        .await?;
    Ok(Json(records))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<Attendance>>> {
    let Query(page) = query?;
    let page = page.validate()?;
    let (records, total) = state
        .with_db(move |conn| {
            let repo = AttendanceRecords::new(conn);
            Ok((repo.list(page)?, repo.count()?))
        })
        .await?;
    Ok(Json(Page::new(records, page, total)))
}

pub async fn get_attendance(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Attendance>> {
    state
        .with_db(move |conn| AttendanceRecords::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::AttendanceNotFound))
}

/// Partial update; fields missing from the body are left alone.
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AttendanceUpdate>, JsonRejection>,
) -> Result<Json<Attendance>> {
    let Json(patch) = payload?;
    state
        .with_db(move |conn| AttendanceRecords::new(conn).update(id, &patch))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::AttendanceNotFound))
}

pub async fn delete_attendance(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<MessageBody>> {
    if !state.with_db(move |conn| AttendanceRecords::new(conn).delete(id)).await? {
        return Err(AppError::NotFound(Message::AttendanceNotFound));
    }
    Ok(message(Message::AttendanceDeleted))
}
