//! Shape descriptors and the renderer that turns a record plus its arena into JSON.
//!
//! A [`Shape`] is decided per call site. Rules:
//! - no rules: every scalar field and every relationship, recursively;
//! - `exclude("rel")` drops a relationship at this level, `exclude("rel.inner")` one level down;
//! - `only([...])` keeps exactly the named scalar fields and no relationships;
//! - `nest("rel", shape)` replaces the shape used for one relationship.
//!
//! Each entity type contributes its own default excludes (see [`Record::default_excludes`]),
//! and a record already on the render path is never rendered again below itself.

use crate::model::{Graph, Kind, Record, Related};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    only: Option<Vec<String>>,
    excludes: Vec<String>,
    nested: BTreeMap<String, Shape>,
}

impl Shape {
    /// All fields and relationships.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly these scalar fields, no relationships.
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Shape {
            only: Some(fields.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Drop a relationship. Dotted paths address relationships of nested records.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excludes.push(path.into());
        self
    }

    /// Render `relation` with `shape` instead of the inherited one.
    pub fn nest(mut self, relation: impl Into<String>, shape: Shape) -> Self {
        self.nested.insert(relation.into(), shape);
        self
    }

    fn excludes_relation(&self, relation: &str) -> bool {
        self.excludes.iter().any(|e| e == relation)
    }

    fn with_defaults(&self, record: &dyn Record) -> Shape {
        let mut shape = self.clone();
        shape
            .excludes
            .extend(record.default_excludes().iter().map(|e| (*e).to_owned()));
        shape
    }

    fn child(&self, relation: &str) -> Shape {
        let mut child = self.nested.get(relation).cloned().unwrap_or_default();
        let prefix = format!("{}.", relation);
        child.excludes.extend(
            self.excludes
                .iter()
                .filter_map(|e| e.strip_prefix(prefix.as_str()))
                .map(str::to_owned),
        );
        child
    }
}

/// Render `record` under `shape`, resolving relationships through `graph`.
pub fn render(record: &dyn Record, graph: &Graph, shape: &Shape) -> Value {
    let mut path = Vec::new();
    render_at(record, graph, shape, &mut path)
}

/// Render each record under the same shape.
pub fn render_all<'a, I, R>(records: I, graph: &Graph, shape: &Shape) -> Value
where
    I: IntoIterator<Item = &'a R>,
    R: Record + 'a,
{
    Value::Array(
        records
            .into_iter()
            .map(|r| render(r, graph, shape))
            .collect(),
    )
}

fn render_at(record: &dyn Record, graph: &Graph, shape: &Shape, path: &mut Vec<(Kind, i64)>) -> Value {
    let mut out = Map::new();

    if let Some(only) = &shape.only {
        for name in only {
            if let Some(v) = record.field(name) {
                out.insert(name.clone(), v);
            }
        }
        return Value::Object(out);
    }

    for name in record.fields() {
        if let Some(v) = record.field(name) {
            out.insert((*name).to_owned(), v);
        }
    }

    let shape = shape.with_defaults(record);
    path.push((record.kind(), record.id()));
    for relation in record.relations() {
        if shape.excludes_relation(relation.name) {
            continue;
        }
        let child_shape = shape.child(relation.name);
        let value = match graph.resolve(record, relation) {
            Related::One(None) => Value::Null,
            Related::One(Some(target)) => {
                if on_path(path, target) {
                    continue;
                }
                render_at(target, graph, &child_shape, path)
            }
            Related::Many(targets) => {
                let mut items = Vec::with_capacity(targets.len());
                for target in targets {
                    if !on_path(path, target) {
                        items.push(render_at(target, graph, &child_shape, path));
                    }
                }
                Value::Array(items)
            }
        };
        out.insert(relation.name.to_owned(), value);
    }
    path.pop();

    Value::Object(out)
}

fn on_path(path: &[(Kind, i64)], record: &dyn Record) -> bool {
    path.contains(&(record.kind(), record.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pizza, Price, Restaurant, RestaurantPizza};
    use serde_json::json;

    fn graph() -> Graph {
        let mut graph = Graph::new();
        graph.insert_restaurant(Restaurant { id: 1, name: "Karen's Pizza Shack".into(), address: "address1".into() });
        graph.insert_restaurant(Restaurant { id: 2, name: "Kiki's Pizza".into(), address: "address3".into() });
        graph.insert_pizza(Pizza { id: 1, name: "Emma".into(), ingredients: "Dough, Tomato Sauce, Cheese".into() });
        graph.insert_pizza(Pizza { id: 2, name: "Geri".into(), ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni".into() });
        graph.insert_restaurant_pizza(RestaurantPizza { id: 1, price: Price::Whole(10), restaurant_id: 1, pizza_id: 1 });
        graph.insert_restaurant_pizza(RestaurantPizza { id: 2, price: Price::Decimal(12.5), restaurant_id: 1, pizza_id: 2 });
        graph.insert_restaurant_pizza(RestaurantPizza { id: 3, price: Price::Whole(8), restaurant_id: 2, pizza_id: 1 });
        graph
    }

    #[test]
    fn test_exclude_relationship() {
        let graph = graph();
        let shape = Shape::new().exclude("restaurant_pizzas");
        let out = render(graph.restaurant(1).unwrap(), &graph, &shape);
        assert_eq!(out, json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"}));
    }

    #[test]
    fn test_full_restaurant_cuts_back_reference() {
        let graph = graph();
        let out = render(graph.restaurant(1).unwrap(), &graph, &Shape::new());
        assert_eq!(
            out,
            json!({
                "id": 1,
                "name": "Karen's Pizza Shack",
                "address": "address1",
                "restaurant_pizzas": [
                    {
                        "id": 1, "price": 10, "restaurant_id": 1, "pizza_id": 1,
                        "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"}
                    },
                    {
                        "id": 2, "price": 12.5, "restaurant_id": 1, "pizza_id": 2,
                        "pizza": {"id": 2, "name": "Geri", "ingredients": "Dough, Tomato Sauce, Cheese, Pepperoni"}
                    }
                ]
            })
        );
        for rp in out["restaurant_pizzas"].as_array().unwrap() {
            assert!(rp.get("restaurant").is_none());
        }
    }

    #[test]
    fn test_only_on_nested_relationships() {
        let graph = graph();
        let shape = Shape::new()
            .nest("pizza", Shape::only(["id", "name", "ingredients"]))
            .nest("restaurant", Shape::only(["id", "name", "address"]));
        let out = render(graph.restaurant_pizza(3).unwrap(), &graph, &shape);
        assert_eq!(
            out,
            json!({
                "id": 3, "price": 8, "restaurant_id": 2, "pizza_id": 1,
                "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"},
                "restaurant": {"id": 2, "name": "Kiki's Pizza", "address": "address3"}
            })
        );
    }

    #[test]
    fn test_only_ignores_relationship_and_unknown_names() {
        let graph = graph();
        let shape = Shape::only(["name", "restaurant_pizzas", "nope"]);
        let out = render(graph.pizza(1).unwrap(), &graph, &shape);
        assert_eq!(out, json!({"name": "Emma"}));
    }

    #[test]
    fn test_dotted_exclude_reaches_nested_level() {
        let graph = graph();
        let shape = Shape::new().exclude("restaurant_pizzas.pizza");
        let out = render(graph.restaurant(2).unwrap(), &graph, &shape);
        assert_eq!(
            out["restaurant_pizzas"],
            json!([{"id": 3, "price": 8, "restaurant_id": 2, "pizza_id": 1}])
        );
    }

    #[test]
    fn test_rules_are_per_call_site() {
        let graph = graph();
        let pizza = graph.pizza(1).unwrap();
        let bare = render(pizza, &graph, &Shape::new().exclude("restaurant_pizzas"));
        let full = render(pizza, &graph, &Shape::new());
        assert!(bare.get("restaurant_pizzas").is_none());
        let rps = full["restaurant_pizzas"].as_array().unwrap();
        assert_eq!(rps.len(), 2);
        assert_eq!(rps[0]["restaurant"], json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"}));
        assert!(rps[0].get("pizza").is_none());
    }

    #[test]
    fn test_missing_to_one_renders_null() {
        let graph = Graph::new();
        let rp = RestaurantPizza { id: 5, price: Price::Whole(2), restaurant_id: 1, pizza_id: 1 };
        let out = render(&rp, &graph, &Shape::new());
        assert_eq!(out["restaurant"], Value::Null);
        assert_eq!(out["pizza"], Value::Null);
    }

    #[test]
    fn test_render_all_empty() {
        let graph = Graph::new();
        let none: Vec<Restaurant> = Vec::new();
        assert_eq!(render_all(&none, &graph, &Shape::new()), json!([]));
    }
}
