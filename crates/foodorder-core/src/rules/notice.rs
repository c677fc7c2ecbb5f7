use crate::domain::order::RawOrder;
use crate::error::CoreError;
use crate::time::parse_order_timestamp;
use serde::Serialize;

pub const DEFAULT_STALE_AFTER_DAYS: i64 = 14;
pub const MAX_STALE_AFTER_DAYS: i64 = 365;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderNotice {
    pub latest_ordered_at: i64,
    pub total_meals: usize,
    /// The newest order is older than the configured number of whole days,
    /// which usually means an old export was uploaded.
    pub is_stale: bool,
}

pub fn validate_stale_days(days: i64) -> Result<i64, CoreError> {
    if (1..=MAX_STALE_AFTER_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(CoreError::InvalidStaleDays(days))
    }
}

pub fn order_notice(orders: &[RawOrder], now_utc: i64, stale_after_days: i64) -> Option<OrderNotice> {
    let latest = orders
        .iter()
        .filter_map(|order| order.timestamp())
        .filter_map(|raw| parse_order_timestamp(&raw).ok())
        .max()?;

    let age_days = (now_utc - latest).div_euclid(SECONDS_PER_DAY);
    Some(OrderNotice {
        latest_ordered_at: latest,
        total_meals: orders.len(),
        is_stale: age_days > stale_after_days,
    })
}
