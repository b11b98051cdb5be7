use crate::error::AppError;
use crate::model::Graph;
use crate::response::success_ok;
use crate::shape::{render_all, Shape};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// GET /pizzas
pub async fn list_pizzas(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    tracing::info!("GET /pizzas");
    let pizzas = state.store.list_pizzas().await?;
    let shape = Shape::new().exclude("restaurant_pizzas");
    Ok(success_ok(render_all(&pizzas, &Graph::new(), &shape)))
}
