//! The `Integrand` trait, which defines the function to be summed over a grid.

/// A function to be integrated over a `D`-dimensional grid with coordinates
/// of type `T`.
///
/// Every `Fn([T; D]) -> R` implements this trait, so closures and plain
/// functions can be passed directly. Implementations must be pure: the value
/// may only depend on the point, never on how often or in which order the
/// integrand was called.
pub trait Integrand<T, const D: usize> {
    /// The value type produced at each grid point.
    type Output;

    /// Returns the number of dimensions of the integration space.
    fn dim(&self) -> usize {
        D
    }

    /// Evaluates the function at the point `x`.
    fn eval(&self, x: [T; D]) -> Self::Output;
}

impl<T, R, F, const D: usize> Integrand<T, D> for F
where
    F: Fn([T; D]) -> R,
{
    type Output = R;

    #[inline]
    fn eval(&self, x: [T; D]) -> R {
        self(x)
    }
}
