pub mod batch;
pub mod email;
pub mod ids;
pub mod order;
pub mod restaurant;

pub use batch::{LatestBatch, StoredBatch};
pub use email::{display_name_from_email, email_local_part, is_valid_email};
pub use ids::BatchId;
pub use order::{
    normalize_order, normalize_orders, NormalizedOrder, RawOrder, EMAIL_FIELD, LEGACY_EMAIL_FIELD,
    MEAL_FIELD, TIMESTAMP_FIELD,
};
pub use restaurant::{
    parse_restaurant_tag, strip_restaurant_tag, RestaurantTag, TagMatch, UNKNOWN_RESTAURANT,
};
