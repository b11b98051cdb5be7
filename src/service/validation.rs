//! Request validation for menu entry creation.

use crate::model::{NewRestaurantPizza, Price, PriceError};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a request body was rejected. Callers only ever see the generic "validation errors";
/// the detail is for logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid JSON body: {0}")]
    Body(String),
    #[error("body must be a JSON object")]
    NotAnObject,
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be an integer id")]
    InvalidId(&'static str),
    #[error(transparent)]
    Price(#[from] PriceError),
}

pub struct RequestValidator;

impl RequestValidator {
    /// Checks, in order: object body, `price` present and within range, then both ids.
    pub fn validate_restaurant_pizza(body: &Value) -> Result<NewRestaurantPizza, ValidationError> {
        let Value::Object(map) = body else {
            return Err(ValidationError::NotAnObject);
        };
        let price = Price::from_json(required(map, "price")?)?;
        let restaurant_id = id_field(map, "restaurant_id")?;
        let pizza_id = id_field(map, "pizza_id")?;
        Ok(NewRestaurantPizza {
            price,
            restaurant_id,
            pizza_id,
        })
    }
}

fn required<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ValidationError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ValidationError::Missing(key)),
        Some(v) => Ok(v),
    }
}

fn id_field(map: &Map<String, Value>, key: &'static str) -> Result<i64, ValidationError> {
    required(map, key)?
        .as_i64()
        .ok_or(ValidationError::InvalidId(key))
}
