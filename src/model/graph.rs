use super::{Kind, Link, Pizza, Record, Relation, Restaurant, RestaurantPizza};
use std::collections::BTreeMap;

/// Id-keyed arena of loaded records. Relationships are resolved by foreign key lookups here,
/// in id order, and only for records that were loaded.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    restaurants: BTreeMap<i64, Restaurant>,
    pizzas: BTreeMap<i64, Pizza>,
    restaurant_pizzas: BTreeMap<i64, RestaurantPizza>,
}

/// Result of resolving one relationship of a record.
pub enum Related<'a> {
    One(Option<&'a dyn Record>),
    Many(Vec<&'a dyn Record>),
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    pub fn insert_pizza(&mut self, pizza: Pizza) {
        self.pizzas.insert(pizza.id, pizza);
    }

    pub fn insert_restaurant_pizza(&mut self, restaurant_pizza: RestaurantPizza) {
        self.restaurant_pizzas.insert(restaurant_pizza.id, restaurant_pizza);
    }

    pub fn restaurant(&self, id: i64) -> Option<&Restaurant> {
        self.restaurants.get(&id)
    }

    pub fn pizza(&self, id: i64) -> Option<&Pizza> {
        self.pizzas.get(&id)
    }

    pub fn restaurant_pizza(&self, id: i64) -> Option<&RestaurantPizza> {
        self.restaurant_pizzas.get(&id)
    }

    pub fn get(&self, kind: Kind, id: i64) -> Option<&dyn Record> {
        match kind {
            Kind::Restaurant => self.restaurant(id).map(|r| r as &dyn Record),
            Kind::Pizza => self.pizza(id).map(|p| p as &dyn Record),
            Kind::RestaurantPizza => self.restaurant_pizza(id).map(|rp| rp as &dyn Record),
        }
    }

    fn records(&self, kind: Kind) -> Box<dyn Iterator<Item = &dyn Record> + '_> {
        match kind {
            Kind::Restaurant => Box::new(self.restaurants.values().map(|r| r as &dyn Record)),
            Kind::Pizza => Box::new(self.pizzas.values().map(|p| p as &dyn Record)),
            Kind::RestaurantPizza => {
                Box::new(self.restaurant_pizzas.values().map(|rp| rp as &dyn Record))
            }
        }
    }

    pub fn resolve(&self, from: &dyn Record, relation: &Relation) -> Related<'_> {
        match relation.link {
            Link::ToOne { foreign_key } => Related::One(
                from.foreign_key(foreign_key)
                    .and_then(|id| self.get(relation.target, id)),
            ),
            Link::ToMany { foreign_key } => {
                let owner = from.id();
                Related::Many(
                    self.records(relation.target)
                        .filter(|r| r.foreign_key(foreign_key) == Some(owner))
                        .collect(),
                )
            }
        }
    }
}
