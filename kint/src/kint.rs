//! The grid integrator and its free-function entry points.

use std::ops::Mul;

use log::debug;
use num_traits::Float;

use crate::accumulator::{Compensated, MeanAccumulator};
use crate::error::Result;
use crate::grid::GridSpec;
use crate::integrand::Integrand;
use crate::sweep::Sweep;

/// A `D`-dimensional grid integrator.
///
/// The grid is derived once by [`Kint::new`] and can then be swept any number
/// of times. Every call owns its own sample point and accumulators, so a
/// `Kint` can be shared across threads as long as the integrand is pure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kint<T, const D: usize> {
    grid: GridSpec<T, D>,
}

impl<T: Float, const D: usize> Kint<T, D> {
    /// Creates an integrator over the grid with `count[d]` points per axis
    /// in `[min[d], max[d])`.
    ///
    /// # Arguments
    ///
    /// * `min`: The lower bound of each axis, which is sampled.
    /// * `max`: The upper bound of each axis, which is not sampled.
    /// * `count`: The number of sampling points of each axis.
    pub fn new(min: [T; D], max: [T; D], count: [usize; D]) -> Result<Self> {
        Ok(Kint {
            grid: GridSpec::new(min, max, count)?,
        })
    }

    /// Creates an integrator over an already derived grid.
    pub fn from_grid(grid: GridSpec<T, D>) -> Self {
        Kint { grid }
    }

    pub fn grid(&self) -> &GridSpec<T, D> {
        &self.grid
    }

    /// Returns the number of dimensions of the integrator.
    pub fn dim(&self) -> usize {
        D
    }

    /// Returns the compensated Riemann sum `Σ f(x) Π_d increment[d]` over the
    /// grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use kint::Kint;
    ///
    /// let kint = Kint::new([0.0, 0.0], [1.0, 2.0], [100, 100]).unwrap();
    /// let area = kint.integrate(&|_: [f64; 2]| 1.0);
    /// assert!((area - 2.0).abs() < 1e-12);
    /// ```
    pub fn integrate<F>(&self, integrand: &F) -> F::Output
    where
        F: Integrand<T, D> + ?Sized,
        F::Output: Compensated + Mul<T, Output = F::Output>,
    {
        let value = Sweep::new(&self.grid).fold(integrand);
        debug!(
            "integrated {} points of a {}-dimensional grid",
            self.grid.n_points(),
            D
        );
        value
    }

    /// Returns the arithmetic mean of the integrand over the grid points.
    ///
    /// # Examples
    ///
    /// ```
    /// use kint::Kint;
    ///
    /// let kint = Kint::new([0.0], [4.0], [4]).unwrap();
    /// assert_eq!(kint.mean(&|x: [f64; 1]| x[0]), 1.5);
    /// ```
    pub fn mean<F>(&self, integrand: &F) -> F::Output
    where
        F: Integrand<T, D> + ?Sized,
        F::Output: Compensated + Mul<T, Output = F::Output>,
    {
        let mut acc = MeanAccumulator::<F::Output, T>::new();
        Sweep::new(&self.grid).for_each(|x| acc.accumulate(integrand.eval(x)));
        debug!(
            "averaged {} points of a {}-dimensional grid",
            acc.count(),
            D
        );
        acc.extract()
    }
}

/// Integrates `integrand` over the grid with `count[d]` points per axis in
/// `[min[d], max[d])`.
///
/// This is the one-shot form of [`Kint::new`] followed by
/// [`Kint::integrate`].
///
/// # Errors
///
/// Returns a [`GridError`](crate::GridError) before any evaluation if the
/// grid is invalid.
///
/// # Examples
///
/// ```
/// use kint::integrate;
///
/// let value = integrate(|x: [f64; 1]| x[0], [0.0], [4.0], [10_000]).unwrap();
/// assert!((value - 8.0).abs() < 1e-3);
/// ```
pub fn integrate<T, F, const D: usize>(
    integrand: F,
    min: [T; D],
    max: [T; D],
    count: [usize; D],
) -> Result<F::Output>
where
    T: Float,
    F: Integrand<T, D>,
    F::Output: Compensated + Mul<T, Output = F::Output>,
{
    Ok(Kint::new(min, max, count)?.integrate(&integrand))
}

/// Returns the arithmetic mean of `integrand` over the grid with `count[d]`
/// points per axis in `[min[d], max[d])`.
///
/// # Errors
///
/// Returns a [`GridError`](crate::GridError) if the grid is invalid.
pub fn mean<T, F, const D: usize>(
    integrand: F,
    min: [T; D],
    max: [T; D],
    count: [usize; D],
) -> Result<F::Output>
where
    T: Float,
    F: Integrand<T, D>,
    F::Output: Compensated + Mul<T, Output = F::Output>,
{
    Ok(Kint::new(min, max, count)?.mean(&integrand))
}
