//! Outcome of a `submit` call.

use serde::Serialize;

use crate::error::MatchingError;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Error {
        error: MatchingError,
    },
    /// Rested with no match at all.
    Open {
        order_id: String,
    },
    /// Matched against one or more makers but left a remainder resting.
    Partial {
        order_id: String,
        remaining_qty: i64,
        trade_ids: Vec<String>,
    },
    /// Matched completely, nothing left to rest.
    Filled {
        order_id: String,
        trade_ids: Vec<String>,
    },
}

impl Outcome {
    pub fn trade_ids(&self) -> Vec<String> {
        match self {
            Outcome::Partial { trade_ids, .. } | Outcome::Filled { trade_ids, .. } => {
                trade_ids.clone()
            }
            Outcome::Error { .. } | Outcome::Open { .. } => Vec::new(),
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            Outcome::Open { order_id }
            | Outcome::Partial { order_id, .. }
            | Outcome::Filled { order_id, .. } => Some(order_id),
            Outcome::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_ids_empty_for_open_and_error() {
        assert!(Outcome::Open { order_id: "x".into() }.trade_ids().is_empty());
        assert!(Outcome::Error { error: MatchingError::InvalidPrice }.trade_ids().is_empty());
    }

    #[test]
    fn test_trade_ids_present_for_partial_and_filled() {
        let partial = Outcome::Partial {
            order_id: "x".into(),
            remaining_qty: 5,
            trade_ids: vec!["1".into()],
        };
        assert_eq!(partial.trade_ids(), vec!["1".to_string()]);

        let filled = Outcome::Filled {
            order_id: "x".into(),
            trade_ids: vec!["1".into(), "2".into()],
        };
        assert_eq!(filled.trade_ids(), vec!["1".to_string(), "2".to_string()]);
    }
}
