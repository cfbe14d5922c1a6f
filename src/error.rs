//! Configuration errors raised while declaring or looking up features.

use crate::feature::Symbol;
use thiserror::Error;

/// An error in the feature configuration.
///
/// These are only expected while the feature set is being built;
/// degraded feature values are reported through [crate::FeatureState] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// A feature with this symbol has already been declared.
    #[error("Feature `{0}` is already declared")]
    DuplicateSymbol(Symbol),

    /// The declared lower bound exceeds the upper bound.
    #[error("Feature `{symbol}` has lower bound {lower} above upper bound {upper}")]
    InvalidBounds { symbol: Symbol, lower: f64, upper: f64 },

    /// No feature with this symbol has been declared.
    #[error("Feature `{0}` is not declared")]
    NotFound(Symbol),
}

/// Result type alias for feature configuration.
pub type Result<T> = std::result::Result<T, FeatureError>;
