//! Resource routes.

use crate::handlers::{
    create_restaurant_pizza, delete_restaurant, get_restaurant, index, list_pizzas,
    list_restaurants,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/restaurants", get(list_restaurants))
        .route("/restaurants/:id", get(get_restaurant).delete(delete_restaurant))
        .route("/pizzas", get(list_pizzas))
        .route("/restaurant_pizzas", post(create_restaurant_pizza))
        .with_state(state)
}
