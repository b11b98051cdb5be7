//! Menu entry creation.

use crate::error::AppError;
use crate::response::success_created;
use crate::service::{RequestValidator, ValidationError};
use crate::shape::{render, Shape};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// POST /restaurant_pizzas
///
/// Body: `{"price": 1..=30, "restaurant_id": int, "pizza_id": int}`. Any malformed body is a
/// validation error; a store refusal (unknown restaurant or pizza) reports the store's message.
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("POST /restaurant_pizzas");
    let Json(body) = payload.map_err(|rejection| ValidationError::Body(rejection.body_text()))?;
    let new = RequestValidator::validate_restaurant_pizza(&body)?;

    let detail = state
        .store
        .create_restaurant_pizza(new)
        .await
        .map_err(|e| match e {
            AppError::Db(e) => AppError::operation(e),
            other => other,
        })?;

    let shape = Shape::new()
        .nest("pizza", Shape::only(["id", "name", "ingredients"]))
        .nest("restaurant", Shape::only(["id", "name", "address"]));
    let graph = detail.graph();
    Ok(success_created(render(&detail.record, &graph, &shape)))
}
