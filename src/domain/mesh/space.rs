use num_traits::{Float, Num};
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// A Point (or Vector) in `D`-dimensional Real Space
///
/// The dimension is part of the type, so mixing points of different dimensions is rejected at compile time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T, const D: usize> {
    coords: [T; D],
}

/// 2D point with `f64` coordinates
pub type Point2 = Point<f64, 2>;
/// 3D point with `f64` coordinates
pub type Point3 = Point<f64, 3>;

impl<T: Copy, const D: usize> Point<T, D> {
    pub const fn new(coords: [T; D]) -> Self {
        Self { coords }
    }

    /// Number of components
    pub const fn dim(&self) -> usize {
        D
    }

    pub fn coords(&self) -> &[T; D] {
        &self.coords
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.coords.iter()
    }
}

impl<T: Copy + Num, const D: usize> Point<T, D> {
    pub fn origin() -> Self {
        Self {
            coords: [T::zero(); D],
        }
    }

    pub fn dot(&self, other: &Self) -> T {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(T::zero(), |acc, (a, b)| acc + *a * *b)
    }

    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    pub fn distance_squared(&self, other: &Self) -> T {
        (*self - *other).norm_squared()
    }

    /// Copy the leading components into a Point of dimension `E` (components beyond `D` are zero)
    pub(crate) fn resize<const E: usize>(&self) -> Point<T, E> {
        let mut resized = Point::origin();
        for (r, c) in resized.coords.iter_mut().zip(self.coords.iter()) {
            *r = *c;
        }
        resized
    }
}

impl<T: Copy + Float, const D: usize> Point<T, D> {
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    pub fn distance(&self, other: &Self) -> T {
        self.distance_squared(other).sqrt()
    }

    /// The midpoint between two Points
    pub fn between(a: &Self, b: &Self) -> Self {
        (*a + *b) / (T::one() + T::one())
    }
}

impl<T: Copy + Num> Point<T, 3> {
    /// Cross product (only defined in 3D)
    pub fn cross(&self, other: &Self) -> Self {
        let [a0, a1, a2] = self.coords;
        let [b0, b1, b2] = other.coords;
        Self::new([a1 * b2 - a2 * b1, a2 * b0 - a0 * b2, a0 * b1 - a1 * b0])
    }
}

impl<T: Copy + Num, const D: usize> Default for Point<T, D> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<T: Copy, const D: usize> From<[T; D]> for Point<T, D> {
    fn from(coords: [T; D]) -> Self {
        Self { coords }
    }
}

impl<T, const D: usize> Index<usize> for Point<T, D> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        assert!(
            index < D,
            "Component index {} is out of range for a {}D Point!",
            index,
            D
        );
        &self.coords[index]
    }
}

impl<T, const D: usize> IndexMut<usize> for Point<T, D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(
            index < D,
            "Component index {} is out of range for a {}D Point!",
            index,
            D
        );
        &mut self.coords[index]
    }
}

impl<T: Copy + Num, const D: usize> Add for Point<T, D> {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl<T: Copy + Num, const D: usize> Sub for Point<T, D> {
    type Output = Self;
    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl<T: Copy + Num + Neg<Output = T>, const D: usize> Neg for Point<T, D> {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            coords: self.coords.map(|c| -c),
        }
    }
}

impl<T: Copy + Num, const D: usize> Mul<T> for Point<T, D> {
    type Output = Self;
    fn mul(mut self, coefficient: T) -> Self {
        self *= coefficient;
        self
    }
}

impl<const D: usize> Mul<Point<f64, D>> for f64 {
    type Output = Point<f64, D>;
    fn mul(self, point: Point<f64, D>) -> Point<f64, D> {
        point * self
    }
}

impl<const D: usize> Mul<Point<i32, D>> for i32 {
    type Output = Point<i32, D>;
    fn mul(self, point: Point<i32, D>) -> Point<i32, D> {
        point * self
    }
}

impl<T: Copy + Num, const D: usize> Div<T> for Point<T, D> {
    type Output = Self;
    fn div(mut self, divisor: T) -> Self {
        self /= divisor;
        self
    }
}

impl<T: Copy + Num, const D: usize> AddAssign for Point<T, D> {
    fn add_assign(&mut self, other: Self) {
        for (c, o) in self.coords.iter_mut().zip(other.coords) {
            *c = *c + o;
        }
    }
}

impl<T: Copy + Num, const D: usize> SubAssign for Point<T, D> {
    fn sub_assign(&mut self, other: Self) {
        for (c, o) in self.coords.iter_mut().zip(other.coords) {
            *c = *c - o;
        }
    }
}

impl<T: Copy + Num, const D: usize> MulAssign<T> for Point<T, D> {
    fn mul_assign(&mut self, coefficient: T) {
        for c in self.coords.iter_mut() {
            *c = *c * coefficient;
        }
    }
}

impl<T: Copy + Num, const D: usize> DivAssign<T> for Point<T, D> {
    fn div_assign(&mut self, divisor: T) {
        for c in self.coords.iter_mut() {
            *c = *c / divisor;
        }
    }
}

impl<T: fmt::Display, const D: usize> fmt::Display for Point<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
