//! The regular rectangular grid swept by the integrators.

use log::debug;
use num_traits::Float;

use crate::error::{GridError, Result};

/// A single axis of the integration domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAxis<T> {
    /// The lower bound, which is also the first sampling coordinate.
    min: T,
    /// The upper bound. It is never sampled itself.
    max: T,
    /// The number of sampling points along the axis.
    count: usize,
    /// The step size `(max - min) / count`, also the weight of every sample.
    increment: T,
}

impl<T: Float> GridAxis<T> {
    /// Creates an axis sampled at `count` points starting at `min`.
    ///
    /// `axis` is only used to label the error.
    pub fn new(axis: usize, min: T, max: T, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(GridError::ZeroCount { axis });
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(GridError::NonFiniteBound { axis });
        }
        let increment = match T::from(count) {
            Some(n) => (max - min) / n,
            None => T::nan(),
        };
        if !increment.is_finite() {
            return Err(GridError::NonFiniteIncrement { axis });
        }

        Ok(GridAxis {
            min,
            max,
            count,
            increment,
        })
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn increment(&self) -> T {
        self.increment
    }

    /// Returns the `n`-th sampling coordinate, `min + n * increment`.
    ///
    /// The coordinate is computed from `n` directly rather than by repeated
    /// addition, so it does not drift over long axes.
    #[inline]
    pub fn coordinate(&self, n: usize) -> T {
        // `n < count` and `count` converted in `new`, so this cannot fail.
        let n = T::from(n).unwrap_or_else(T::nan);
        self.min + n * self.increment
    }
}

/// The `D` axes of a rectangular grid, indexed `0..D`.
///
/// Axis `0` is the innermost axis of the sweep and axis `D - 1` the outermost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec<T, const D: usize> {
    axes: [GridAxis<T>; D],
}

impl<T: Float, const D: usize> GridSpec<T, D> {
    /// Derives the grid from per-axis bounds and step counts.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if `D == 0`, if any count is zero, or if any
    /// bound or step size is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use kint::GridSpec;
    ///
    /// let grid = GridSpec::new([0.0, -1.0], [4.0, 1.0], [8, 4]).unwrap();
    /// assert_eq!(grid.increments(), [0.5, 0.5]);
    /// assert_eq!(grid.n_points(), 32);
    /// ```
    pub fn new(min: [T; D], max: [T; D], count: [usize; D]) -> Result<Self> {
        if D == 0 {
            return Err(GridError::NoAxes);
        }

        let mut axes = [GridAxis {
            min: T::zero(),
            max: T::zero(),
            count: 1,
            increment: T::zero(),
        }; D];
        for d in 0..D {
            axes[d] = GridAxis::new(d, min[d], max[d], count[d])?;
        }

        let grid = GridSpec { axes };
        debug!(
            "grid of dimension {} with {} points, counts {:?}",
            D,
            grid.n_points(),
            count
        );
        Ok(grid)
    }

    /// Returns the number of axes.
    pub fn dim(&self) -> usize {
        D
    }

    pub fn axes(&self) -> &[GridAxis<T>; D] {
        &self.axes
    }

    pub fn axis(&self, d: usize) -> &GridAxis<T> {
        &self.axes[d]
    }

    /// The lower corner of the grid, which is the first sampled point.
    pub fn min(&self) -> [T; D] {
        self.axes.map(|a| a.min)
    }

    pub fn increments(&self) -> [T; D] {
        self.axes.map(|a| a.increment)
    }

    /// The volume element `Π_d increment[d]` represented by one grid point.
    pub fn cell_volume(&self) -> T {
        self.axes.iter().fold(T::one(), |v, a| v * a.increment)
    }

    /// The total number of grid points, saturating at `usize::MAX`.
    pub fn n_points(&self) -> usize {
        self.axes
            .iter()
            .fold(1usize, |n, a| n.saturating_mul(a.count))
    }
}
