use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};




/**
 * A vector in the plane. Components are `(x, y)`.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2(pub f64, pub f64);




/**
 * A 2x2 matrix, stored row-major as `(a, b, c, d)`:
 *
 * ```text
 * | a  b |
 * | c  d |
 * ```
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix2(pub f64, pub f64, pub f64, pub f64);




// ============================================================================
impl Vector2 {

    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    pub fn zeros() -> Self {
        Self(0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn dot(&self, other: Self) -> f64 {
        self.0 * other.0 + self.1 * other.1
    }

    pub fn norm(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /**
     * Rotate this vector a quarter turn clockwise: `(x, y) -> (y, -x)`.
     * Applied to the chord of a counter-clockwise polygon, it yields the
     * outward normal.
     */
    pub fn perp(&self) -> Self {
        Self(self.1, -self.0)
    }

    /**
     * Return the tensor (outer) product `self ⊗ other`.
     */
    pub fn outer(&self, other: Self) -> Matrix2 {
        Matrix2(
            self.0 * other.0,
            self.0 * other.1,
            self.1 * other.0,
            self.1 * other.1)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}




// ============================================================================
impl Matrix2 {

    pub fn zeros() -> Self {
        Self(0.0, 0.0, 0.0, 0.0)
    }

    pub fn identity() -> Self {
        Self(1.0, 0.0, 0.0, 1.0)
    }

    pub fn trace(&self) -> f64 {
        self.0 + self.3
    }

    pub fn determinant(&self) -> f64 {
        self.0 * self.3 - self.1 * self.2
    }

    /**
     * The largest absolute entry. Used to put the determinant on a scale.
     */
    pub fn max_abs(&self) -> f64 {
        self.0.abs().max(self.1.abs()).max(self.2.abs()).max(self.3.abs())
    }

    /**
     * Return the closed-form inverse, or `None` if the determinant is zero,
     * non-finite, or negligible compared to the square of the largest entry.
     */
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        let scale = self.max_abs();

        if !det.is_finite() || det.abs() <= f64::EPSILON * scale * scale {
            None
        } else {
            Some(Self(self.3, -self.1, -self.2, self.0) * (1.0 / det))
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite() && self.3.is_finite()
    }
}




// ============================================================================
impl Add<Vector2> for Vector2 {
    type Output = Self;
    fn add(self, v: Self) -> Self {
        Self(self.0 + v.0, self.1 + v.1)
    }
}

impl Sub<Vector2> for Vector2 {
    type Output = Self;
    fn sub(self, v: Self) -> Self {
        Self(self.0 - v.0, self.1 - v.1)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;
    fn div(self, a: f64) -> Self {
        Self(self.0 / a, self.1 / a)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0, -self.1)
    }
}

impl AddAssign<Vector2> for Vector2 {
    fn add_assign(&mut self, v: Self) {
        self.0 += v.0;
        self.1 += v.1;
    }
}

impl Sum for Vector2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeros(), Add::add)
    }
}




// ============================================================================
impl Add<Matrix2> for Matrix2 {
    type Output = Self;
    fn add(self, m: Self) -> Self {
        Self(self.0 + m.0, self.1 + m.1, self.2 + m.2, self.3 + m.3)
    }
}

impl Sub<Matrix2> for Matrix2 {
    type Output = Self;
    fn sub(self, m: Self) -> Self {
        Self(self.0 - m.0, self.1 - m.1, self.2 - m.2, self.3 - m.3)
    }
}

impl Mul<f64> for Matrix2 {
    type Output = Self;
    fn mul(self, a: f64) -> Self {
        Self(self.0 * a, self.1 * a, self.2 * a, self.3 * a)
    }
}

impl Mul<Vector2> for Matrix2 {
    type Output = Vector2;
    fn mul(self, v: Vector2) -> Vector2 {
        Vector2(
            self.0 * v.0 + self.1 * v.1,
            self.2 * v.0 + self.3 * v.1)
    }
}

impl Mul<Matrix2> for Matrix2 {
    type Output = Self;
    fn mul(self, m: Self) -> Self {
        Self(
            self.0 * m.0 + self.1 * m.2,
            self.0 * m.1 + self.1 * m.3,
            self.2 * m.0 + self.3 * m.2,
            self.2 * m.1 + self.3 * m.3)
    }
}

impl AddAssign<Matrix2> for Matrix2 {
    fn add_assign(&mut self, m: Self) {
        *self = *self + m
    }
}

impl Sum for Matrix2 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeros(), Add::add)
    }
}
