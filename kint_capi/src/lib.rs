//! The C-language interface for `KINT`

use std::ffi::c_void;
use std::os::raw::c_int;
use std::slice;

use kint::{GridError, Integrand, Kint};

/// The largest grid dimension supported through the C interface.
pub const KINT_MAX_DIM: usize = 6;

/// The call succeeded and the result was written.
pub const KINT_OK: c_int = 0;
/// The grid specification is invalid (zero count, non-finite bound or step).
pub const KINT_INVALID_GRID: c_int = -1;
/// The dimension is zero or larger than `KINT_MAX_DIM`.
pub const KINT_UNSUPPORTED_DIM: c_int = -2;
/// A required pointer argument is null.
pub const KINT_NULL_POINTER: c_int = -3;

/// A C-compatible struct for integration boundaries.
#[repr(C)]
pub struct CBoundary {
    pub min: f64,
    pub max: f64,
}

/// The C-style integrand function pointer.
/// The first argument is the point `x` (an array of f64).
/// The second argument is the dimension.
/// The third is a user-provided `user_data` pointer.
pub type CIntegrand = extern "C" fn(*const f64, c_int, *mut c_void) -> f64;

/// A wrapper that implements the Rust `Integrand` trait.
struct CIntegrandWrapper {
    func: CIntegrand,
    user_data: *mut c_void,
}

impl<const D: usize> Integrand<f64, D> for CIntegrandWrapper {
    type Output = f64;

    fn eval(&self, x: [f64; D]) -> f64 {
        (self.func)(x.as_ptr(), D as c_int, self.user_data)
    }
}

#[derive(Clone, Copy)]
enum Reduction {
    Integral,
    Mean,
}

fn status(err: &GridError) -> c_int {
    log::debug!("rejected grid: {err}");
    KINT_INVALID_GRID
}

fn run<const D: usize>(
    boundaries: &[CBoundary],
    counts: &[usize],
    integrand: &CIntegrandWrapper,
    reduction: Reduction,
) -> Result<f64, c_int> {
    let min: [f64; D] = std::array::from_fn(|d| boundaries[d].min);
    let max: [f64; D] = std::array::from_fn(|d| boundaries[d].max);
    let count: [usize; D] = std::array::from_fn(|d| counts[d]);

    let kint = Kint::new(min, max, count).map_err(|e| status(&e))?;
    Ok(match reduction {
        Reduction::Integral => kint.integrate(integrand),
        Reduction::Mean => kint.mean(integrand),
    })
}

/// Dispatches a runtime dimension to the matching const-generic grid.
unsafe fn dispatch(
    dim: usize,
    boundaries: *const CBoundary,
    counts: *const usize,
    integrand: CIntegrandWrapper,
    out: *mut f64,
    reduction: Reduction,
) -> c_int {
    if dim == 0 || dim > KINT_MAX_DIM {
        return KINT_UNSUPPORTED_DIM;
    }
    if boundaries.is_null() || counts.is_null() || out.is_null() {
        return KINT_NULL_POINTER;
    }

    let boundaries = slice::from_raw_parts(boundaries, dim);
    let counts = slice::from_raw_parts(counts, dim);

    let result = match dim {
        1 => run::<1>(boundaries, counts, &integrand, reduction),
        2 => run::<2>(boundaries, counts, &integrand, reduction),
        3 => run::<3>(boundaries, counts, &integrand, reduction),
        4 => run::<4>(boundaries, counts, &integrand, reduction),
        5 => run::<5>(boundaries, counts, &integrand, reduction),
        _ => run::<6>(boundaries, counts, &integrand, reduction),
    };

    match result {
        Ok(value) => {
            *out = value;
            KINT_OK
        }
        Err(code) => code,
    }
}

/// Integrates the given function over a `dim`-dimensional grid and writes
/// the compensated Riemann sum to `out`.
///
/// Returns `KINT_OK` on success and a negative status code otherwise, in
/// which case `out` is left untouched and the integrand is never called.
///
/// # Safety
///
/// `boundaries` and `counts` must be valid pointers to arrays of size `dim`,
/// `out` must be a valid pointer to a single `f64`, and `integrand_func`
/// must be a valid function pointer.
#[no_mangle]
pub unsafe extern "C" fn kint_integrate(
    dim: usize,
    boundaries: *const CBoundary,
    counts: *const usize,
    integrand_func: CIntegrand,
    user_data: *mut c_void,
    out: *mut f64,
) -> c_int {
    let integrand = CIntegrandWrapper {
        func: integrand_func,
        user_data,
    };
    dispatch(dim, boundaries, counts, integrand, out, Reduction::Integral)
}

/// Averages the given function over a `dim`-dimensional grid and writes the
/// mean to `out`.
///
/// # Safety
///
/// Same requirements as `kint_integrate`.
#[no_mangle]
pub unsafe extern "C" fn kint_mean(
    dim: usize,
    boundaries: *const CBoundary,
    counts: *const usize,
    integrand_func: CIntegrand,
    user_data: *mut c_void,
    out: *mut f64,
) -> c_int {
    let integrand = CIntegrandWrapper {
        func: integrand_func,
        user_data,
    };
    dispatch(dim, boundaries, counts, integrand, out, Reduction::Mean)
}
