use super::{Graph, Kind, Link, Pizza, Price, Record, Relation, Restaurant};
use serde_json::Value;

/// A pizza on a restaurant's menu, at a price.
#[derive(Clone, Debug, PartialEq)]
pub struct RestaurantPizza {
    pub id: i64,
    pub price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

/// Validated input for creating a [`RestaurantPizza`]. The price is range-checked by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRestaurantPizza {
    pub price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

/// A freshly created record together with the restaurant and pizza it links,
/// all read inside the creating transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct RestaurantPizzaDetail {
    pub record: RestaurantPizza,
    pub restaurant: Restaurant,
    pub pizza: Pizza,
}

impl RestaurantPizzaDetail {
    /// Arena holding the linked restaurant and pizza (and the record itself).
    pub fn graph(&self) -> Graph {
        let mut graph = Graph::new();
        graph.insert_restaurant(self.restaurant.clone());
        graph.insert_pizza(self.pizza.clone());
        graph.insert_restaurant_pizza(self.record.clone());
        graph
    }
}

const FIELDS: &[&str] = &["id", "price", "restaurant_id", "pizza_id"];

const RELATIONS: &[Relation] = &[
    Relation {
        name: "restaurant",
        target: Kind::Restaurant,
        link: Link::ToOne { foreign_key: "restaurant_id" },
    },
    Relation {
        name: "pizza",
        target: Kind::Pizza,
        link: Link::ToOne { foreign_key: "pizza_id" },
    },
];

impl Record for RestaurantPizza {
    fn kind(&self) -> Kind {
        Kind::RestaurantPizza
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn fields(&self) -> &'static [&'static str] {
        FIELDS
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "price" => Some(self.price.to_json()),
            "restaurant_id" => Some(Value::from(self.restaurant_id)),
            "pizza_id" => Some(Value::from(self.pizza_id)),
            _ => None,
        }
    }

    fn relations(&self) -> &'static [Relation] {
        RELATIONS
    }

    fn default_excludes(&self) -> &'static [&'static str] {
        &["restaurant.restaurant_pizzas", "pizza.restaurant_pizzas"]
    }
}
