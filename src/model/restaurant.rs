use super::{Kind, Link, Record, Relation};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

const FIELDS: &[&str] = &["id", "name", "address"];

const RELATIONS: &[Relation] = &[Relation {
    name: "restaurant_pizzas",
    target: Kind::RestaurantPizza,
    link: Link::ToMany { foreign_key: "restaurant_id" },
}];

impl Record for Restaurant {
    fn kind(&self) -> Kind {
        Kind::Restaurant
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
            "address" => Some(Value::from(self.address.as_str())),
            _ => None,
        }
    }

    fn relations(&self) -> &'static [Relation] {
        RELATIONS
    }

    fn default_excludes(&self) -> &'static [&'static str] {
        &["restaurant_pizzas.restaurant"]
    }
}
