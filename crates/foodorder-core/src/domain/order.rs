use crate::domain::email::email_local_part;
use crate::domain::restaurant::{strip_restaurant_tag, RestaurantTag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TIMESTAMP_FIELD: &str = "Timestamp";
pub const EMAIL_FIELD: &str = "Email Address";
/// Older form exports named the submitter column `Username`.
pub const LEGACY_EMAIL_FIELD: &str = "Username";
pub const MEAL_FIELD: &str = "meal";

/// One uploaded row, kept exactly as submitted.
///
/// Fields stay loosely typed until validation; unknown columns are carried
/// along so stored batches round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOrder(Map<String, Value>);

impl RawOrder {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String value of a field; non-string values are not coerced.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<String> {
        match self.0.get(TIMESTAMP_FIELD)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Submitter address, preferring the canonical column over the legacy one.
    pub fn email(&self) -> Option<&str> {
        self.text(EMAIL_FIELD)
            .or_else(|| self.text(LEGACY_EMAIL_FIELD))
    }

    pub fn meal(&self) -> Option<&str> {
        self.text(MEAL_FIELD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOrder {
    /// Trimmed meal text as submitted, tag included.
    pub meal: String,
    /// The meal without its restaurant tag; tallies count by this.
    pub dish: String,
    pub restaurant: RestaurantTag,
    pub email: String,
    pub requested_by: String,
}

/// Canonical form of a row, or `None` when the row has no meal.
pub fn normalize_order(order: &RawOrder) -> Option<NormalizedOrder> {
    let meal = order.meal()?.trim().to_string();
    let email = order.email().map(str::trim).unwrap_or_default().to_string();
    let requested_by = if email.is_empty() {
        String::new()
    } else {
        email_local_part(&email).to_string()
    };

    Some(NormalizedOrder {
        restaurant: RestaurantTag::from_meal(&meal),
        dish: strip_restaurant_tag(&meal),
        meal,
        email,
        requested_by,
    })
}

pub fn normalize_orders(orders: &[RawOrder]) -> Vec<NormalizedOrder> {
    orders.iter().filter_map(normalize_order).collect()
}
