use core::ops::Add;
use rayon::prelude::*;




/**
 * An associative binary operator with a neutral element. Partial results
 * can be merged in any order; with floating-point data the merge order may
 * change the last bits of the result.
 */
pub trait Reducer<T>: Sync {
    fn neutral(&self) -> T;
    fn combine(&self, a: T, b: T) -> T;
}

/// Summation. The neutral element is `T::default()`, which is zero for
/// `f64`, `Vector2` and `Matrix2`.
#[derive(Clone, Copy, Debug)]
pub struct Sum;

/// Minimum of reals. The neutral element is positive infinity.
#[derive(Clone, Copy, Debug)]
pub struct Min;

impl<T> Reducer<T> for Sum
where
    T: Default + Add<Output = T>,
{
    fn neutral(&self) -> T {
        T::default()
    }

    fn combine(&self, a: T, b: T) -> T {
        a + b
    }
}

impl Reducer<f64> for Min {
    fn neutral(&self) -> f64 {
        f64::INFINITY
    }

    fn combine(&self, a: f64, b: f64) -> f64 {
        a.min(b)
    }
}




/**
 * Fold a sequence from the left, starting at the reducer's neutral element.
 * This is the canonical merge order, used within a single entity (e.g. the
 * corners of a cell) and for reproducible reference results.
 */
pub fn fold<T, R, I>(reducer: &R, items: I) -> T
where
    R: Reducer<T>,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .fold(reducer.neutral(), |a, b| reducer.combine(a, b))
}

/**
 * Reduce `f(i)` over the entity domain `0..len` using the Rayon thread pool.
 * Each worker folds a contiguous chunk and the partial results are merged
 * in an unspecified order.
 */
pub fn par_reduce<T, R, F>(reducer: &R, len: usize, f: F) -> T
where
    T: Send,
    R: Reducer<T>,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..len)
        .into_par_iter()
        .fold(|| reducer.neutral(), |a, i| reducer.combine(a, f(i)))
        .reduce(|| reducer.neutral(), |a, b| reducer.combine(a, b))
}
