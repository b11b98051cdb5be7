//! Entity records and their declared field and relationship tables.
//!
//! Records refer to each other by id only. Related records are resolved through a [`Graph`]
//! arena, so a render never follows a live back-pointer.

mod graph;
mod pizza;
mod price;
mod restaurant;
mod restaurant_pizza;

pub use graph::{Graph, Related};
pub use pizza::Pizza;
pub use price::{Price, PriceError, MAX_PRICE, MIN_PRICE};
pub use restaurant::Restaurant;
pub use restaurant_pizza::{NewRestaurantPizza, RestaurantPizza, RestaurantPizzaDetail};

use serde_json::Value;

/// Entity type tag, used to address records in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Restaurant,
    Pizza,
    RestaurantPizza,
}

/// How a relationship is resolved: which side holds the foreign key column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// This record holds `foreign_key`, pointing at the target's id.
    ToOne { foreign_key: &'static str },
    /// Targets hold `foreign_key`, pointing at this record's id.
    ToMany { foreign_key: &'static str },
}

/// One entry in an entity's relationship table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relation {
    /// Output key and the name used by shape rules.
    pub name: &'static str,
    pub target: Kind,
    pub link: Link,
}

/// A persisted record, viewed through its declared field and relationship tables.
pub trait Record: Send + Sync {
    fn kind(&self) -> Kind;

    fn id(&self) -> i64;

    /// Scalar field names, in output order.
    fn fields(&self) -> &'static [&'static str];

    /// Value of a scalar field; `None` for unknown names and for relationship names.
    fn field(&self, name: &str) -> Option<Value>;

    fn relations(&self) -> &'static [Relation] {
        &[]
    }

    /// Exclude rules merged into every render of this type. They cut the back references
    /// that lead through the join entity to the record being rendered.
    fn default_excludes(&self) -> &'static [&'static str] {
        &[]
    }

    fn foreign_key(&self, column: &str) -> Option<i64> {
        self.field(column).and_then(|v| v.as_i64())
    }
}
