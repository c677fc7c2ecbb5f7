//! Client view state, changed only by [`reduce`].
//!
//! The state is a plain value: every action consumes the old state and
//! yields the next one, so callers can persist or discard snapshots freely.

use crate::domain::order::RawOrder;
use crate::rules::roster::{who_ordered_what, RosterEntry};
use crate::rules::tally::{tally_orders, MealTally};
use crate::rules::validation::{validate_orders, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewError {
    /// The uploaded file does not match the order schema.
    Validation(ValidationError),
    /// The gateway could not be reached; local orders stay usable but unsaved.
    Connectivity { message: String },
    /// Saving a valid upload failed; the orders are still shown.
    PersistFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub orders: Vec<RawOrder>,
    pub error: Option<ViewError>,
    pub admin_view: bool,
    pub loading: bool,
    pub search_term: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            error: None,
            admin_view: false,
            loading: true,
            search_term: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UploadParsed(Vec<RawOrder>),
    PersistStarted,
    PersistSucceeded,
    PersistFailed(String),
    LatestLoaded(Vec<RawOrder>),
    LatestFailed(String),
    Clear,
    SetSearchTerm(String),
    SetAdminView(bool),
}

pub fn reduce(state: ViewState, action: Action) -> ViewState {
    match action {
        Action::UploadParsed(orders) => match validate_orders(&orders) {
            Ok(()) => ViewState {
                orders,
                error: None,
                ..state
            },
            Err(err) => ViewState {
                orders: Vec::new(),
                error: Some(ViewError::Validation(err)),
                ..state
            },
        },
        Action::PersistStarted => ViewState {
            loading: true,
            ..state
        },
        Action::PersistSucceeded => ViewState {
            loading: false,
            ..state
        },
        Action::PersistFailed(message) => ViewState {
            loading: false,
            error: Some(ViewError::PersistFailed { message }),
            ..state
        },
        Action::LatestLoaded(orders) => ViewState {
            orders,
            error: None,
            loading: false,
            ..state
        },
        Action::LatestFailed(message) => ViewState {
            orders: Vec::new(),
            error: Some(ViewError::Connectivity { message }),
            loading: false,
            ..state
        },
        Action::Clear => ViewState {
            orders: Vec::new(),
            error: None,
            loading: false,
            ..state
        },
        Action::SetSearchTerm(search_term) => ViewState {
            search_term,
            ..state
        },
        Action::SetAdminView(admin_view) => ViewState {
            admin_view,
            ..state
        },
    }
}

impl ViewState {
    pub fn has_orders(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn tally(&self) -> MealTally {
        tally_orders(&self.orders)
    }

    pub fn roster(&self) -> Vec<RosterEntry> {
        who_ordered_what(&self.orders, &self.search_term)
    }
}
