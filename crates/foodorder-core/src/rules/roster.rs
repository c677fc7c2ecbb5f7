use crate::domain::email::display_name_from_email;
use crate::domain::order::RawOrder;
use crate::time::parse_order_timestamp;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub name: String,
    pub meal: String,
    pub ordered_at: Option<i64>,
}

/// "Who ordered what": one entry per row with a submitter, sorted by name and
/// filtered by a case-insensitive substring of the name.
pub fn who_ordered_what(orders: &[RawOrder], search_term: &str) -> Vec<RosterEntry> {
    let needle = search_term.trim().to_lowercase();

    let mut entries: Vec<RosterEntry> = orders
        .iter()
        .filter_map(|order| {
            let email = order.email()?;
            Some(RosterEntry {
                name: display_name_from_email(email),
                meal: order.meal().map(str::trim).unwrap_or_default().to_string(),
                ordered_at: order
                    .timestamp()
                    .and_then(|raw| parse_order_timestamp(&raw).ok()),
            })
        })
        .collect();

    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
    entries.retain(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle));
    entries
}

#[cfg(test)]
mod tests {
    use super::who_ordered_what;
    use crate::domain::order::RawOrder;

    fn order(email: &str, meal: &str) -> RawOrder {
        RawOrder::new()
            .with_field("Timestamp", "2020-01-01")
            .with_field("Email Address", email)
            .with_field("meal", meal)
    }

    fn sample() -> Vec<RawOrder> {
        vec![
            order("rosa.parks@x.com", "[Fafa] Salad"),
            order("Ada.Lovelace@x.com", "[Sushi] Maki"),
            order("linus@x.com", "[Fafa] Wrap"),
            RawOrder::new().with_field("meal", "[Fafa] Orphan"),
        ]
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let names: Vec<String> = who_ordered_what(&sample(), "")
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["Ada Lovelace", "linus", "rosa parks"]);
    }

    #[test]
    fn filters_by_name_substring() {
        let hits = who_ordered_what(&sample(), "  ROSA ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].meal, "[Fafa] Salad");
        assert_eq!(hits[0].ordered_at, Some(1_577_836_800));

        assert!(who_ordered_what(&sample(), "nobody").is_empty());
    }
}
