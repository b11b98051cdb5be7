//! Entity store and request validation.

mod entity_store;
mod validation;
pub use entity_store::{EntityStore, SqlEntityStore};
pub use validation::{RequestValidator, ValidationError};
