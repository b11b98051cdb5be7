//! Pizza API: restaurants, pizzas and priced menu entries over JSON, backed by SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod shape;
pub mod state;
pub mod store;

pub use config::{from_env, ServerConfig};
pub use error::{AppError, ConfigError};
pub use model::{Graph, Pizza, Price, Restaurant, RestaurantPizza};
pub use routes::{api_routes, app, common_routes_with_ready};
pub use service::{EntityStore, SqlEntityStore};
pub use shape::{render, Shape};
pub use state::AppState;
pub use store::{connect, ensure_tables, seed_sample_data};
