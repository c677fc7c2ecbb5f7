use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequential identifier assigned by the store when a batch is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub i64);

impl BatchId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BatchId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(CoreError::InvalidBatchId(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BatchId;
    use std::str::FromStr;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!(BatchId::from_str(" 42 ").unwrap(), BatchId(42));
        assert!(BatchId::from_str("0").is_err());
        assert!(BatchId::from_str("-3").is_err());
        assert!(BatchId::from_str("latest").is_err());
    }
}
