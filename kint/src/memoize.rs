//! Memoization of pure functions behind a lookup table.
//!
//! A [`Memoizer`] wraps a function `Fn(A) -> R` and remembers the value
//! returned for every argument it has seen. Arguments are looked up through
//! their [`MemoKey`], which maps floating point values to their bit pattern
//! so that `f64` tuples and arrays can be used as keys.

use std::cell::{Cell, RefCell};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::integrand::Integrand;

/// An argument type that can index a memoization table.
pub trait MemoKey {
    /// The hashable key derived from the argument.
    type Key: Eq + Hash;

    fn memo_key(&self) -> Self::Key;
}

macro_rules! impl_memo_key_identity {
    ($($t:ty),*) => {
        $(
            impl MemoKey for $t {
                type Key = $t;

                #[inline]
                fn memo_key(&self) -> $t {
                    *self
                }
            }
        )*
    };
}

impl_memo_key_identity!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize
);

macro_rules! impl_memo_key_float {
    ($($t:ty => $bits:ty),*) => {
        $(
            impl MemoKey for $t {
                type Key = $bits;

                /// `-0.0` and `0.0` compare equal and share a key.
                #[inline]
                fn memo_key(&self) -> $bits {
                    if *self == 0.0 {
                        (0.0 as $t).to_bits()
                    } else {
                        self.to_bits()
                    }
                }
            }
        )*
    };
}

impl_memo_key_float!(f32 => u32, f64 => u64);

macro_rules! impl_memo_key_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name: MemoKey),+> MemoKey for ($($name,)+) {
                type Key = ($($name::Key,)+);

                #[inline]
                #[allow(non_snake_case)]
                fn memo_key(&self) -> Self::Key {
                    let ($($name,)+) = self;
                    ($($name.memo_key(),)+)
                }
            }
        )*
    };
}

impl_memo_key_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

impl<K: MemoKey, const N: usize> MemoKey for [K; N] {
    type Key = [K::Key; N];

    #[inline]
    fn memo_key(&self) -> Self::Key {
        std::array::from_fn(|i| self[i].memo_key())
    }
}

/// A function with a memoizing lookup table in front of it.
///
/// The table lives behind a `RefCell`, so calls only need `&self` and a
/// memoized function can be passed wherever an [`Integrand`] is expected.
/// A `Memoizer` is therefore not `Sync`.
pub struct Memoizer<A: MemoKey, R, F> {
    func: F,
    table: RefCell<FxHashMap<A::Key, R>>,
    /// The maximum number of stored entries, `0` meaning unbounded.
    capacity: usize,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<A, R, F> Memoizer<A, R, F>
where
    A: MemoKey,
    R: Clone,
    F: Fn(A) -> R,
{
    /// Wraps `func` with an unbounded table.
    pub fn new(func: F) -> Self {
        Self::with_capacity(func, 0)
    }

    /// Wraps `func` with a table holding at most `capacity` entries.
    ///
    /// Once the table is full, arguments that are not stored yet are
    /// evaluated on every call. A capacity of `0` means unbounded.
    pub fn with_capacity(func: F, capacity: usize) -> Self {
        Memoizer {
            func,
            table: RefCell::new(FxHashMap::default()),
            capacity,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Returns `func(args)`, from the table if it was computed before.
    pub fn call(&self, args: A) -> R {
        let key = args.memo_key();
        if let Some(value) = self.table.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return value.clone();
        }

        self.misses.set(self.misses.get() + 1);
        // `func` runs with the table unborrowed, so it may call back into
        // this memoizer.
        let value = (self.func)(args);
        let mut table = self.table.borrow_mut();
        if self.capacity == 0 || table.len() < self.capacity {
            table.insert(key, value.clone());
        }
        value
    }
}

impl<A: MemoKey, R, F> Memoizer<A, R, F> {
    /// The number of stored entries.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of calls answered from the table.
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// The number of calls that evaluated the wrapped function.
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Drops every stored entry and resets the counters.
    pub fn clear(&self) {
        self.table.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }
}

impl<T, R, F, const D: usize> Integrand<T, D> for Memoizer<[T; D], R, F>
where
    T: MemoKey,
    R: Clone,
    F: Fn([T; D]) -> R,
{
    type Output = R;

    fn eval(&self, x: [T; D]) -> R {
        self.call(x)
    }
}

/// Wraps `func` in an unbounded [`Memoizer`].
///
/// # Examples
///
/// ```
/// use kint::memoize;
/// use num_complex::Complex;
///
/// let iexp = memoize(|(a, phi): (f64, f64)| Complex::new(a, phi).exp());
/// let first = iexp.call((1.0, 0.5));
/// let second = iexp.call((1.0, 0.5));
/// assert_eq!(first, second);
/// assert_eq!((iexp.hits(), iexp.misses()), (1, 1));
/// ```
pub fn memoize<A, R, F>(func: F) -> Memoizer<A, R, F>
where
    A: MemoKey,
    R: Clone,
    F: Fn(A) -> R,
{
    Memoizer::new(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kint::Kint;

    #[test]
    fn test_stores_each_argument_once() {
        let evaluations = Cell::new(0);
        let square = memoize(|x: i64| {
            evaluations.set(evaluations.get() + 1);
            x * x
        });

        for _ in 0..3 {
            for x in -5..5 {
                assert_eq!(square.call(x), x * x);
            }
        }
        assert_eq!(evaluations.get(), 10);
        assert_eq!(square.len(), 10);
        assert_eq!(square.hits(), 20);
        assert_eq!(square.misses(), 10);
    }

    #[test]
    fn test_bounded_table() {
        let evaluations = Cell::new(0);
        let double = Memoizer::with_capacity(
            |x: u32| {
                evaluations.set(evaluations.get() + 1);
                2 * x
            },
            2,
        );

        assert_eq!(double.call(1), 2);
        assert_eq!(double.call(2), 4);
        assert_eq!(double.call(3), 6);
        assert_eq!(double.call(3), 6);
        assert_eq!(double.call(1), 2);

        assert_eq!(double.len(), 2);
        assert_eq!(double.capacity(), 2);
        assert_eq!(evaluations.get(), 4);
    }

    #[test]
    fn test_float_keys() {
        assert_eq!(0.0_f64.memo_key(), (-0.0_f64).memo_key());
        assert_ne!(1.0_f64.memo_key(), 1.0000000000000002_f64.memo_key());
        assert_eq!((1u8, 2.5_f32).memo_key(), (1u8, 2.5_f32.to_bits()));
        assert_eq!([0.5_f64, -0.0].memo_key(), [0.5_f64.to_bits(), 0]);
    }

    #[test]
    fn test_clear() {
        let id = memoize(|x: char| x);
        id.call('a');
        id.call('a');
        assert!(!id.is_empty());

        id.clear();
        assert!(id.is_empty());
        assert_eq!((id.hits(), id.misses()), (0, 0));
    }

    #[test]
    fn test_memoized_integrand() {
        let evaluations = Cell::new(0);
        let f = memoize(|x: [f64; 2]| {
            evaluations.set(evaluations.get() + 1);
            x[0] * x[1]
        });

        let kint = Kint::new([0.0, 0.0], [1.0, 1.0], [8, 8]).unwrap();
        let first = kint.integrate(&f);
        let second = kint.integrate(&f);

        assert_eq!(first, second);
        assert_eq!(evaluations.get(), 64);
        assert_eq!(f.hits(), 64);
    }
}
