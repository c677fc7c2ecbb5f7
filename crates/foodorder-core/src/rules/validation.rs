use crate::domain::email::is_valid_email;
use crate::domain::order::{RawOrder, EMAIL_FIELD, LEGACY_EMAIL_FIELD, MEAL_FIELD, TIMESTAMP_FIELD};
use crate::domain::restaurant::{parse_restaurant_tag, TagMatch};
use crate::time::parse_order_timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const MIN_MEAL_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Timestamp,
    Email,
    Meal { min_len: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub rule: FieldRule,
}

/// Required columns of an uploaded batch. Columns not listed here are ignored.
#[derive(Debug, Clone, Copy)]
pub struct OrderSchema {
    pub fields: &'static [FieldSpec],
}

/// The one schema every upload path validates against.
pub const ORDER_SCHEMA: OrderSchema = OrderSchema {
    fields: &[
        FieldSpec {
            name: TIMESTAMP_FIELD,
            aliases: &[],
            rule: FieldRule::Timestamp,
        },
        FieldSpec {
            name: EMAIL_FIELD,
            aliases: &[LEGACY_EMAIL_FIELD],
            rule: FieldRule::Email,
        },
        FieldSpec {
            name: MEAL_FIELD,
            aliases: &[],
            rule: FieldRule::Meal {
                min_len: MIN_MEAL_LEN,
            },
        },
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    NotAString,
    InvalidDate,
    InvalidEmail,
    TooShort { min_len: usize },
    MissingRestaurantTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Zero-based position of the row in the batch.
    pub row: usize,
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn message(&self) -> String {
        let field = &self.field;
        let problem = match &self.kind {
            ViolationKind::Missing => format!("\"{field}\" is required"),
            ViolationKind::NotAString => format!("\"{field}\" must be a string"),
            ViolationKind::InvalidDate => format!("\"{field}\" must be a valid date"),
            ViolationKind::InvalidEmail => format!("\"{field}\" must be a valid email"),
            ViolationKind::TooShort { min_len } => {
                format!("\"{field}\" must be at least {min_len} characters long")
            }
            ViolationKind::MissingRestaurantTag => {
                format!("\"{field}\" must name the restaurant in brackets, e.g. [Fafa]")
            }
        };
        format!("row {}: {}", self.row + 1, problem)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} invalid field(s) in uploaded orders", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl OrderSchema {
    pub fn validate(&self, orders: &[RawOrder]) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = orders
            .iter()
            .enumerate()
            .flat_map(|(row, order)| self.check_row(row, order))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    pub fn check_row(&self, row: usize, order: &RawOrder) -> Vec<Violation> {
        self.fields
            .iter()
            .filter_map(|spec| {
                check_field(spec, order).map(|kind| Violation {
                    row,
                    field: spec.name.to_string(),
                    kind,
                })
            })
            .collect()
    }
}

pub fn validate_orders(orders: &[RawOrder]) -> Result<(), ValidationError> {
    ORDER_SCHEMA.validate(orders)
}

fn check_field(spec: &FieldSpec, order: &RawOrder) -> Option<ViolationKind> {
    let value = std::iter::once(spec.name)
        .chain(spec.aliases.iter().copied())
        .find_map(|name| order.get(name).filter(|value| !value.is_null()));

    let Some(value) = value else {
        return Some(ViolationKind::Missing);
    };

    match spec.rule {
        FieldRule::Timestamp => {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                _ => return Some(ViolationKind::InvalidDate),
            };
            parse_order_timestamp(&text)
                .err()
                .map(|_| ViolationKind::InvalidDate)
        }
        FieldRule::Email => {
            let Some(text) = value.as_str() else {
                return Some(ViolationKind::NotAString);
            };
            (!is_valid_email(text)).then_some(ViolationKind::InvalidEmail)
        }
        FieldRule::Meal { min_len } => {
            let Some(text) = value.as_str() else {
                return Some(ViolationKind::NotAString);
            };
            if text.chars().count() < min_len {
                return Some(ViolationKind::TooShort { min_len });
            }
            match parse_restaurant_tag(text) {
                TagMatch::Matched(_) => None,
                TagMatch::Unmatched => Some(ViolationKind::MissingRestaurantTag),
            }
        }
    }
}
