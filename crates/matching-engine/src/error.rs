//! Errors returned by `submit` (validation failures only - internal
//! invariant violations panic rather than return a `Result`, since they
//! indicate engine state corruption rather than bad input).

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingError {
    /// Unreachable while `submit`'s `order_type` parameter is the typed
    /// `OrderType` enum - kept for callers that decode one from an
    /// untyped string (e.g. a future HTTP layer) before reaching `submit`.
    #[error("order type is not supported")]
    InvalidOrderType,

    /// Unreachable while `submit`'s `side` parameter is the typed `Side`
    /// enum - kept for the same reason as `InvalidOrderType`.
    #[error("side must be buy or sell")]
    InvalidSide,

    #[error("price must be positive")]
    InvalidPrice,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("this order type is accepted but not yet implemented")]
    NotImplemented,
}
