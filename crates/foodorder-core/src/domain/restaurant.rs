use crate::error::CoreError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag assigned to meals that name no restaurant.
pub const UNKNOWN_RESTAURANT: &str = "[unknown_restaurant]";

lazy_static! {
    /// A restaurant tag is a bracketed span without inner brackets or line breaks.
    pub(crate) static ref RESTAURANT_TAG_RE: Regex =
        Regex::new(r"\[[^\[\]\r\n]+\]").expect("restaurant tag pattern");
    static ref EMPTY_BRACKETS_RE: Regex = Regex::new(r"\[\s*\]").expect("empty brackets pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    Matched(String),
    Unmatched,
}

/// Finds the first bracketed restaurant tag in a meal description.
pub fn parse_restaurant_tag(meal: &str) -> TagMatch {
    match RESTAURANT_TAG_RE.find(meal.trim()) {
        Some(found) => TagMatch::Matched(found.as_str().to_string()),
        None => TagMatch::Unmatched,
    }
}

/// Meal text with its first restaurant tag removed and whitespace collapsed.
///
/// Falls back to the trimmed meal when nothing but the tag is left.
pub fn strip_restaurant_tag(meal: &str) -> String {
    let trimmed = meal.trim();
    let mut rest = RESTAURANT_TAG_RE.replace(trimmed, " ").into_owned();
    // nested tags leave empty shells behind: `[[Fafa]] Wrap`
    while EMPTY_BRACKETS_RE.is_match(&rest) {
        rest = EMPTY_BRACKETS_RE.replace_all(&rest, " ").into_owned();
    }
    let dish = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if dish.is_empty() {
        trimmed.to_string()
    } else {
        dish
    }
}

/// Lower-cased restaurant tag, brackets included (`[fafa]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantTag(String);

impl RestaurantTag {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        match parse_restaurant_tag(raw) {
            TagMatch::Matched(tag) if tag.len() == raw.trim().len() => {
                Ok(Self(tag.to_lowercase()))
            }
            _ => Err(CoreError::InvalidRestaurantTag(raw.to_string())),
        }
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_RESTAURANT.to_string())
    }

    pub fn from_meal(meal: &str) -> Self {
        match parse_restaurant_tag(meal) {
            TagMatch::Matched(tag) => Self(tag.to_lowercase()),
            TagMatch::Unmatched => Self::unknown(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_RESTAURANT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag without its surrounding brackets, for headings and mail subjects.
    pub fn display_name(&self) -> &str {
        self.0
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for RestaurantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
