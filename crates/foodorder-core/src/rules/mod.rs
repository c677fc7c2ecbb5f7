pub mod grouping;
pub mod notice;
pub mod roster;
pub mod tally;
pub mod validation;

pub use grouping::{group_by_restaurant, RestaurantGroup, RestaurantGroups};
pub use notice::{order_notice, validate_stale_days, OrderNotice, DEFAULT_STALE_AFTER_DAYS};
pub use roster::{who_ordered_what, RosterEntry};
pub use tally::{tally_meals, tally_orders, MealCount, MealTally, RestaurantTally};
pub use validation::{
    validate_orders, FieldRule, FieldSpec, OrderSchema, ValidationError, Violation,
    ViolationKind, MIN_MEAL_LEN, ORDER_SCHEMA,
};
