//! Compensated accumulators for long sums of weighted samples.
//!
//! Both accumulators use the Kahan–Babuška–Neumaier variant of compensated
//! summation: every addition is split into its rounded result and the
//! low-order part the rounding discarded, and the discarded parts are summed
//! separately and added back only when the value is extracted.
//!
//! <https://en.wikipedia.org/wiki/Kahan_summation_algorithm#Further_enhancements>

use std::marker::PhantomData;
use std::ops::{Add, Mul, Sub};

use num_complex::Complex;
use num_traits::{Float, Num, Zero};

/// A value type that can be summed with error compensation.
///
/// Implemented for `f32`, `f64` and [`Complex`] over either of them.
pub trait Compensated: Copy + Zero + Add<Output = Self> + Sub<Output = Self> {
    /// Adds `input` to `sum`, returning the rounded sum and the low-order
    /// part of the exact sum that the rounding lost.
    fn two_sum(sum: Self, input: Self) -> (Self, Self);
}

macro_rules! impl_compensated_float {
    ($($t:ty),*) => {
        $(
            impl Compensated for $t {
                #[inline]
                fn two_sum(sum: Self, input: Self) -> (Self, Self) {
                    let t = sum + input;
                    // Past an overflow or an infinite term `t - t` is NaN, and
                    // nothing was lost to rounding anyway.
                    if !t.is_finite() {
                        return (t, 0.0);
                    }
                    let lost = if sum.abs() >= input.abs() {
                        (sum - t) + input
                    } else {
                        (input - t) + sum
                    };
                    (t, lost)
                }
            }
        )*
    };
}

impl_compensated_float!(f32, f64);

impl<T> Compensated for Complex<T>
where
    T: Compensated + Num,
{
    #[inline]
    fn two_sum(sum: Self, input: Self) -> (Self, Self) {
        let (re, lost_re) = T::two_sum(sum.re, input.re);
        let (im, lost_im) = T::two_sum(sum.im, input.im);
        (Complex::new(re, im), Complex::new(lost_re, lost_im))
    }
}

/// A compensated accumulator of `value * weight` terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KahanAccumulator<R> {
    /// The rounded running total.
    sum: R,
    /// The sum of everything the additions to `sum` rounded away.
    compensation: R,
}

impl<R: Compensated> Default for KahanAccumulator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Compensated> KahanAccumulator<R> {
    /// Creates an empty accumulator, which extracts as zero.
    pub fn new() -> Self {
        KahanAccumulator {
            sum: R::zero(),
            compensation: R::zero(),
        }
    }

    /// Folds `value * weight` into the running total.
    ///
    /// # Examples
    ///
    /// ```
    /// use kint::KahanAccumulator;
    ///
    /// let mut acc = KahanAccumulator::<f64>::new();
    /// acc.accumulate(1.0, 1e100);
    /// acc.accumulate(1.0, 1.0);
    /// acc.accumulate(-1.0, 1e100);
    /// assert_eq!(acc.extract(), 1.0);
    /// ```
    #[inline]
    pub fn accumulate<W>(&mut self, value: R, weight: W)
    where
        R: Mul<W, Output = R>,
    {
        self.add(value * weight);
    }

    /// Folds an already weighted term into the running total.
    #[inline]
    pub fn add(&mut self, term: R) {
        let (sum, lost) = R::two_sum(self.sum, term);
        self.sum = sum;
        self.compensation = self.compensation + lost;
    }

    /// Returns the best estimate of the sum so far.
    ///
    /// The accumulator is left untouched, so this may be called mid-sweep.
    #[inline]
    pub fn extract(&self) -> R {
        self.sum + self.compensation
    }
}

/// A compensated accumulator of the arithmetic mean of unweighted samples.
///
/// `T` is the real scalar type the sample count is converted to when the
/// mean is extracted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanAccumulator<R, T = R> {
    total: KahanAccumulator<R>,
    count: u64,
    scalar: PhantomData<T>,
}

impl<R, T> Default for MeanAccumulator<R, T>
where
    R: Compensated + Mul<T, Output = R>,
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, T> MeanAccumulator<R, T>
where
    R: Compensated + Mul<T, Output = R>,
    T: Float,
{
    pub fn new() -> Self {
        MeanAccumulator {
            total: KahanAccumulator::new(),
            count: 0,
            scalar: PhantomData,
        }
    }

    #[inline]
    pub fn accumulate(&mut self, value: R) {
        self.total.add(value);
        self.count += 1;
    }

    /// The number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The compensated sum of all samples seen so far.
    pub fn sum(&self) -> R {
        self.total.extract()
    }

    /// Returns the mean of the samples seen so far, or zero if there are none.
    pub fn extract(&self) -> R {
        if self.count == 0 {
            return R::zero();
        }
        match T::from(self.count) {
            Some(n) => self.total.extract() * n.recip(),
            None => R::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    #[test]
    fn test_empty_accumulator_is_zero() {
        let acc = KahanAccumulator::<f64>::new();
        assert_eq!(acc.extract(), 0.0);

        let acc = KahanAccumulator::<Complex<f32>>::default();
        assert_eq!(acc.extract(), Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_single_term_is_exact() {
        let mut acc = KahanAccumulator::new();
        acc.accumulate(0.1_f64, 0.3);
        assert_eq!(acc.extract(), 0.1 * 0.3);
    }

    #[test]
    fn test_extract_does_not_mutate() {
        let mut acc = KahanAccumulator::new();
        acc.accumulate(1.5_f64, 2.0);
        let before = acc;
        assert_eq!(acc.extract(), 3.0);
        assert_eq!(acc.extract(), 3.0);
        assert_eq!(acc, before);
    }

    #[test]
    fn test_short_sums_match_naive() {
        let values = [0.5, -1.25, 3.0, 8.0, 0.125, -2.0, 6.5, 1.0, -0.75, 4.0];
        let weights = [1.0, 2.0, 0.5, 0.25, 4.0, 1.0, 2.0, 0.5, 8.0, 1.0];

        let mut acc = KahanAccumulator::new();
        let mut naive = 0.0_f64;
        for (&v, &w) in values.iter().zip(weights.iter()) {
            acc.accumulate(v, w);
            naive += v * w;
            assert_eq!(acc.extract(), naive);
        }
    }

    #[test]
    fn test_recovers_lost_low_order_bits() {
        let mut acc = KahanAccumulator::new();
        let mut naive = 0.0_f64;
        for _ in 0..10_000 {
            acc.add(0.1);
            naive += 0.1;
        }
        assert!((acc.extract() - 1000.0).abs() < 2e-13);
        assert!((naive - 1000.0).abs() > 1e-10);
    }

    #[test]
    fn test_alternating_sign_beats_naive() {
        let mut rng = Pcg64::seed_from_u64(1234);
        let mut acc = KahanAccumulator::<f32>::new();
        let mut naive = 0.0_f32;
        let mut reference = 0.0_f64;

        for i in 0..100_000 {
            let magnitude: f32 = rng.gen_range(1.0e3..1.0e4);
            let value = if i % 2 == 0 { magnitude } else { -0.999 * magnitude };
            let weight: f32 = rng.gen_range(0.5..1.5);
            acc.accumulate(value, weight);
            naive += value * weight;
            reference += f64::from(value * weight);
        }

        let err_kahan = (f64::from(acc.extract()) - reference).abs();
        let err_naive = (f64::from(naive) - reference).abs();
        assert!(
            err_kahan <= err_naive,
            "kahan error {err_kahan} vs naive error {err_naive}"
        );
        assert!(err_kahan < 0.5, "kahan error {err_kahan}");
    }

    #[test]
    fn test_complex_accumulation() {
        let mut acc = KahanAccumulator::new();
        acc.accumulate(Complex::new(1.0_f64, 1e100), 1.0_f64);
        acc.accumulate(Complex::new(1e100, 1.0), 1.0_f64);
        acc.accumulate(Complex::new(-1e100, -1e100), 1.0_f64);
        assert_eq!(acc.extract(), Complex::new(1.0, 1.0));
    }

    #[test]
    fn test_overflow_saturates_to_infinity() {
        let mut acc = KahanAccumulator::new();
        acc.accumulate(f64::MAX, 1.0);
        acc.accumulate(f64::MAX, 1.0);
        assert_eq!(acc.extract(), f64::INFINITY);

        acc.accumulate(1.0, 1.0);
        assert_eq!(acc.extract(), f64::INFINITY);

        let mut acc = KahanAccumulator::new();
        acc.accumulate(-f32::MAX, 2.0_f32);
        assert_eq!(acc.extract(), f32::NEG_INFINITY);
    }

    #[test]
    fn test_infinite_term_propagates() {
        let mut acc = KahanAccumulator::new();
        acc.accumulate(0.1_f64, 0.3);
        acc.accumulate(f64::INFINITY, 0.25);
        acc.accumulate(0.7, 0.3);
        assert_eq!(acc.extract(), f64::INFINITY);

        let mut acc = KahanAccumulator::new();
        acc.accumulate(Complex::new(1.0_f64, f64::INFINITY), 0.5_f64);
        acc.accumulate(Complex::new(2.0, 1.0), 0.5_f64);
        assert_eq!(acc.extract(), Complex::new(1.5, f64::INFINITY));

        let mut mean = MeanAccumulator::<f64>::new();
        mean.accumulate(1.0);
        mean.accumulate(f64::INFINITY);
        assert_eq!(mean.extract(), f64::INFINITY);
    }

    #[test]
    fn test_mean() {
        let mut mean = MeanAccumulator::<f64>::new();
        assert_eq!(mean.extract(), 0.0);

        for v in [1.0_f64, 2.0, 3.0, 4.0] {
            mean.accumulate(v);
        }
        assert_eq!(mean.count(), 4);
        assert_eq!(mean.sum(), 10.0);
        assert_eq!(mean.extract(), 2.5);
    }

    #[test]
    fn test_complex_mean() {
        let mut mean = MeanAccumulator::<Complex<f64>, f64>::new();
        mean.accumulate(Complex::new(1.0_f64, -2.0));
        mean.accumulate(Complex::new(3.0, 2.0));
        assert_eq!(mean.extract(), Complex::new(2.0, 0.0));
    }
}
