use super::{Kind, Link, Record, Relation};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

const FIELDS: &[&str] = &["id", "name", "ingredients"];

const RELATIONS: &[Relation] = &[Relation {
    name: "restaurant_pizzas",
    target: Kind::RestaurantPizza,
    link: Link::ToMany { foreign_key: "pizza_id" },
}];

impl Record for Pizza {
    fn kind(&self) -> Kind {
        Kind::Pizza
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
            "name" => Some(Value::from(self.name.as_str())),
            "ingredients" => Some(Value::from(self.ingredients.as_str())),
            _ => None,
        }
    }

    fn relations(&self) -> &'static [Relation] {
        RELATIONS
    }

    fn default_excludes(&self) -> &'static [&'static str] {
        &["restaurant_pizzas.pizza"]
    }
}
