//! Errors raised while building an integration grid.

use thiserror::Error;

/// Convenience alias used by every fallible constructor in the crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// An invalid grid specification.
///
/// All variants are detected before the first integrand evaluation, so a
/// failed call never evaluates the integrand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no axes at all.
    #[error("invalid grid specification: a grid needs at least one axis")]
    NoAxes,

    /// An axis was given zero sampling points.
    #[error("invalid grid specification: axis {axis} has a step count of zero")]
    ZeroCount { axis: usize },

    /// The lower or upper bound of an axis is `NaN` or infinite.
    #[error("invalid grid specification: axis {axis} has a non-finite bound")]
    NonFiniteBound { axis: usize },

    /// The step size `(max - min) / count` of an axis is not finite, which
    /// happens when the span of the bounds overflows the coordinate type.
    #[error("invalid grid specification: axis {axis} has a non-finite step size")]
    NonFiniteIncrement { axis: usize },
}

impl GridError {
    /// The axis the error refers to, if any.
    pub fn axis(&self) -> Option<usize> {
        match *self {
            GridError::NoAxes => None,
            GridError::ZeroCount { axis }
            | GridError::NonFiniteBound { axis }
            | GridError::NonFiniteIncrement { axis } => Some(axis),
        }
    }
}
