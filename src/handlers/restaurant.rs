//! Restaurant handlers: list, read with menu, delete with cascade.

use crate::error::AppError;
use crate::model::Graph;
use crate::response::{message_body, success_ok};
use crate::shape::{render, render_all, Shape};
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const NOT_FOUND: AppError = AppError::NotFound("Restaurant");

/// Ids that are not integers cannot name a restaurant.
fn restaurant_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| NOT_FOUND)
}

/// GET /restaurants
pub async fn list_restaurants(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("GET /restaurants");
    let restaurants = state.store.list_restaurants().await?;
    let shape = Shape::new().exclude("restaurant_pizzas");
    Ok(success_ok(render_all(&restaurants, &Graph::new(), &shape)))
}

/// GET /restaurants/:id — the restaurant with its menu entries and their pizzas.
pub async fn get_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = restaurant_id(path)?;
    tracing::info!("GET /restaurants/{}", id);
    let graph = state.store.restaurant_graph(id).await?.ok_or(NOT_FOUND)?;
    let restaurant = graph.restaurant(id).ok_or(NOT_FOUND)?;
    Ok(success_ok(render(restaurant, &graph, &Shape::new())))
}

/// DELETE /restaurants/:id
///
/// Answers 204 and still carries a JSON message; HTTP/1.1 servers drop the body on the wire.
pub async fn delete_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = restaurant_id(path)?;
    tracing::info!("DELETE /restaurants/{}", id);
    if !state.store.delete_restaurant(id).await? {
        return Err(NOT_FOUND);
    }
    Ok((
        StatusCode::NO_CONTENT,
        Json(message_body("record successfully deleted")),
    ))
}
