//! `KINT` sums functions over regular rectangular grids of any fixed
//! dimension.
//!
//! The weighted sum `Σ f(x) Π_d increment[d]` over every grid point is a
//! left Riemann sum of the integral of `f` over the grid's domain. Every
//! partial sum is accumulated with Kahan–Babuška–Neumaier compensation, so
//! grids with millions of points per axis lose no more than a few units in
//! the last place. Next to the integrator the crate provides the unweighted
//! mean over the same grid and a memoizer for expensive pure integrands.
//!
//! ```
//! let value = kint::integrate(
//!     |x: [f64; 2]| x[0].sin() * x[1],
//!     [0.0, 0.0],
//!     [4.0, 9.0],
//!     [400, 400],
//! )
//! .unwrap();
//! assert!((value - (1.0 - 4.0_f64.cos()) * 40.5).abs() < 0.3);
//! ```

pub mod accumulator;
pub mod error;
pub mod grid;
pub mod integrand;
pub mod kint;
pub mod memoize;
pub mod sweep;

pub use accumulator::{Compensated, KahanAccumulator, MeanAccumulator};
pub use error::{GridError, Result};
pub use grid::{GridAxis, GridSpec};
pub use integrand::Integrand;
pub use kint::{integrate, mean, Kint};
pub use memoize::{memoize, MemoKey, Memoizer};
pub use num_complex::Complex;
