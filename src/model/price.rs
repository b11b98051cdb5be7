use serde_json::Value;
use thiserror::Error;

pub const MIN_PRICE: i64 = 1;
pub const MAX_PRICE: i64 = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("price must be a number")]
    NotANumber,
    #[error("price must be between 1 and 30")]
    OutOfRange,
}

/// Menu price of a pizza at a restaurant. Always within `[MIN_PRICE, MAX_PRICE]`.
///
/// Whole and decimal prices are kept apart so a price posted as `15` is echoed back as `15`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Price {
    Whole(i64),
    Decimal(f64),
}

impl Price {
    pub fn whole(value: i64) -> Result<Self, PriceError> {
        if (MIN_PRICE..=MAX_PRICE).contains(&value) {
            Ok(Price::Whole(value))
        } else {
            Err(PriceError::OutOfRange)
        }
    }

    pub fn decimal(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotANumber);
        }
        if value < MIN_PRICE as f64 || value > MAX_PRICE as f64 {
            return Err(PriceError::OutOfRange);
        }
        Ok(Price::Decimal(value))
    }

    /// Accepts any JSON number; strings, booleans and null are rejected.
    pub fn from_json(value: &Value) -> Result<Self, PriceError> {
        let Value::Number(n) = value else {
            return Err(PriceError::NotANumber);
        };
        if let Some(whole) = n.as_i64() {
            return Price::whole(whole);
        }
        if n.is_u64() {
            return Err(PriceError::OutOfRange);
        }
        n.as_f64().ok_or(PriceError::NotANumber).and_then(Price::decimal)
    }

    pub fn to_json(&self) -> Value {
        match *self {
            Price::Whole(n) => Value::Number(n.into()),
            Price::Decimal(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(Price::from_json(&json!(1)), Ok(Price::Whole(1)));
        assert_eq!(Price::from_json(&json!(30)), Ok(Price::Whole(30)));
        assert_eq!(Price::from_json(&json!(29.99)), Ok(Price::Decimal(29.99)));
    }

    #[test]
    fn test_out_of_range() {
        for v in [json!(0), json!(31), json!(30.5), json!(0.99), json!(-4), json!(100), json!(u64::MAX)] {
            assert_eq!(Price::from_json(&v), Err(PriceError::OutOfRange), "{v}");
        }
    }

    #[test]
    fn test_wrong_type() {
        for v in [json!("15"), json!(true), json!(null), json!([15]), json!({"amount": 15})] {
            assert_eq!(Price::from_json(&v), Err(PriceError::NotANumber), "{v}");
        }
    }

    #[test]
    fn test_to_json_keeps_whole_prices_whole() {
        assert_eq!(Price::Whole(15).to_json(), json!(15));
        assert_eq!(Price::Decimal(12.5).to_json(), json!(12.5));
    }
}
