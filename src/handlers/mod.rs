//! HTTP handlers for restaurants, pizzas and menu entries.

pub mod index;
pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;
pub use index::*;
pub use pizza::*;
pub use restaurant::*;
pub use restaurant_pizza::*;
