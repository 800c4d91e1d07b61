//! The nested-loop sweep over every point of a grid.
//!
//! Axis `D - 1` is the outermost loop and axis `0` the innermost, so the
//! coordinate of axis `0` changes fastest. The integrand is only evaluated
//! inside the loop of axis `0`.

use std::ops::Mul;

use num_traits::Float;

use crate::accumulator::{Compensated, KahanAccumulator};
use crate::grid::GridSpec;
use crate::integrand::Integrand;

/// A sweep over a [`GridSpec`], owning the sample point it moves around.
#[derive(Debug, Clone)]
pub struct Sweep<'g, T, const D: usize> {
    grid: &'g GridSpec<T, D>,
    /// The current sample point. Axis `k` is overwritten by every step of
    /// the loop over axis `k`.
    point: [T; D],
}

impl<'g, T: Float, const D: usize> Sweep<'g, T, D> {
    pub fn new(grid: &'g GridSpec<T, D>) -> Self {
        Sweep {
            grid,
            point: grid.min(),
        }
    }

    /// Returns the weighted sum `Σ f(x) Π_d increment[d]` over every grid point.
    ///
    /// Each axis owns a compensated accumulator. The innermost one sums
    /// `f(x) * increment[0]` along axis `0`, and the accumulator of axis `k`
    /// sums the results of the axis `k - 1` sweeps weighted by
    /// `increment[k]`. No accumulator ever sees more than `count[k]` terms.
    pub fn fold<F>(&mut self, integrand: &F) -> F::Output
    where
        F: Integrand<T, D> + ?Sized,
        F::Output: Compensated + Mul<T, Output = F::Output>,
    {
        self.fold_axis(D - 1, integrand)
    }

    fn fold_axis<F>(&mut self, axis: usize, integrand: &F) -> F::Output
    where
        F: Integrand<T, D> + ?Sized,
        F::Output: Compensated + Mul<T, Output = F::Output>,
    {
        let grid_axis = *self.grid.axis(axis);
        let mut acc = KahanAccumulator::new();

        for n in 0..grid_axis.count() {
            self.point[axis] = grid_axis.coordinate(n);
            let value = if axis == 0 {
                integrand.eval(self.point)
            } else {
                self.fold_axis(axis - 1, integrand)
            };
            acc.accumulate(value, grid_axis.increment());
        }

        acc.extract()
    }

    /// Calls `visit` once for every grid point, in sweep order.
    pub fn for_each<V>(&mut self, mut visit: V)
    where
        V: FnMut([T; D]),
    {
        self.visit_axis(D - 1, &mut visit);
    }

    fn visit_axis<V>(&mut self, axis: usize, visit: &mut V)
    where
        V: FnMut([T; D]),
    {
        let grid_axis = *self.grid.axis(axis);
        for n in 0..grid_axis.count() {
            self.point[axis] = grid_axis.coordinate(n);
            if axis == 0 {
                visit(self.point);
            } else {
                self.visit_axis(axis - 1, visit);
            }
        }
    }
}
