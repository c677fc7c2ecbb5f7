use anyhow::{Context as _, Result};
use foodorder_core::domain::BatchId;
use foodorder_core::rules::{Violation, ViolationKind};
use std::str::FromStr;

pub fn parse_batch_id(raw: &str) -> Result<BatchId> {
    BatchId::from_str(raw).with_context(|| format!("invalid batch id {raw:?}"))
}

/// What to change in the export to fix a violation.
pub fn remediation_hint(violation: &Violation) -> &'static str {
    match violation.kind {
        ViolationKind::Missing => "add the column to the export or fill in the cell",
        ViolationKind::NotAString => "store the value as text",
        ViolationKind::InvalidDate => "use a date such as 2020-01-31 or 01/31/2020 14:05",
        ViolationKind::InvalidEmail => "use a full address such as name@example.com",
        ViolationKind::TooShort { .. } => "write out the full meal name",
        ViolationKind::MissingRestaurantTag => "prefix the meal with its restaurant, e.g. [Fafa] Salad",
    }
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_batch_id, pluralize, remediation_hint};
    use foodorder_core::rules::{Violation, ViolationKind};

    #[test]
    fn batch_ids_must_be_positive_numbers() {
        assert_eq!(parse_batch_id(" 7 ").expect("id").as_i64(), 7);
        assert!(parse_batch_id("0").is_err());
        assert!(parse_batch_id("latest").is_err());
    }

    #[test]
    fn hints_follow_the_violation_kind() {
        let violation = Violation {
            row: 0,
            field: "meal".to_string(),
            kind: ViolationKind::MissingRestaurantTag,
        };
        assert!(remediation_hint(&violation).contains("[Fafa]"));
    }

    #[test]
    fn pluralizes_counts() {
        assert_eq!(pluralize(1, "meal", "meals"), "1 meal");
        assert_eq!(pluralize(3, "meal", "meals"), "3 meals");
    }
}
