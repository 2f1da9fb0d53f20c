use super::{message, AppState, MessageBody};
use crate::db::payments::{NewPayment, Payment, Payments};
use crate::libs::error::{AppError, Result};
use crate::libs::messages::Message;
use crate::libs::pagination::{Page, PageParams};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> Result<(StatusCode, Json<Payment>)> {
    let Json(payment) = payload?;
    let created = state.with_db(move |conn| Payments::new(conn).insert(&payment)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_payments(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Page<Payment>>> {
    let Query(page) = query?;
    let page = page.validate()?;
    let (payments, total) = state
        .with_db(move |conn| {
            let repo = Payments::new(conn);
            Ok((repo.list(page)?, repo.count()?))
        })
        .await?;
    Ok(Json(Page::new(payments, page, total)))
}

pub async fn get_payment(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Payment>> {
    state
        .with_db(move |conn| Payments::new(conn).get(id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::PaymentNotFound))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> Result<Json<Payment>> {
    let Json(payment) = payload?;
    state
        .with_db(move |conn| Payments::new(conn).update(id, &payment))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(Message::PaymentNotFound))
}

pub async fn delete_payment(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<MessageBody>> {
    if !state.with_db(move |conn| Payments::new(conn).delete(id)).await? {
        return Err(AppError::NotFound(Message::PaymentNotFound));
    }
    Ok(message(Message::PaymentDeleted))
}
