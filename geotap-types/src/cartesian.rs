//! Cartesian (projected or screen) coordinate primitives.

use num_traits::{FromPrimitive, Num, NumCast};

/// 2d point in a cartesian coordinate system.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Num + Copy + PartialOrd;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Sum of the absolute differences of the coordinates.
    ///
    /// Cheaper than the euclidean distance and sufficient for threshold
    /// checks like drag detection.
    fn taxicab_distance(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num
    where
        Self::Num: PartialOrd,
    {
        let dx = if self.x() > other.x() {
            self.x() - other.x()
        } else {
            other.x() - self.x()
        };
        let dy = if self.y() > other.y() {
            self.y() - other.y()
        } else {
            other.y() - self.y()
        };
        dx + dy
    }
}

/// A cartesian point type that can be constructed from a coordinate pair.
pub trait NewCartesianPoint2d<N = f64>: CartesianPoint2d<Num = N> + Sized {
    /// Creates a new point with the given coordinates.
    fn new(x: N, y: N) -> Self;
}

/// Concrete 2d cartesian point used throughout the crates.
pub type Point2d = nalgebra::Point2<f64>;

impl CartesianPoint2d for Point2d {
    type Num = f64;

    fn x(&self) -> f64 {
        self.coords.x
    }

    fn y(&self) -> f64 {
        self.coords.y
    }
}

impl NewCartesianPoint2d for Point2d {
    fn new(x: f64, y: f64) -> Self {
        Point2d::new(x, y)
    }
}

/// Size of a rectangular area, e.g. of the map widget on the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size<N: Num + PartialOrd + Copy = f64> {
    width: N,
    height: N,
}

impl<N: Num + FromPrimitive + PartialOrd + Copy + NumCast> Size<N> {
    /// Creates a new size value.
    pub fn new(width: N, height: N) -> Self {
        Self { width, height }
    }

    /// Width of the area.
    pub fn width(&self) -> N {
        self.width
    }

    /// Half of the width of the area.
    pub fn half_width(&self) -> N {
        self.width / N::from_f64(2.0).expect("const conversion failed")
    }

    /// Height of the area.
    pub fn height(&self) -> N {
        self.height
    }

    /// Half of the height of the area.
    pub fn half_height(&self) -> N {
        self.height / N::from_f64(2.0).expect("const conversion failed")
    }

    /// Returns true if either of the dimensions is zero.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    /// Converts the size into a different numeric type.
    pub fn cast<T: Num + FromPrimitive + PartialOrd + Copy + NumCast>(&self) -> Size<T> {
        Size {
            width: NumCast::from(self.width).expect("invalid value"),
            height: NumCast::from(self.height).expect("invalid value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxicab_distance() {
        let a = Point2d::new(1.0, 2.0);
        let b = Point2d::new(4.0, -2.0);
        assert_eq!(a.taxicab_distance(&b), 7.0);
        assert_eq!(b.taxicab_distance(&a), 7.0);
    }

    #[test]
    fn size_halves() {
        let size = Size::new(100.0, 50.0);
        assert_eq!(size.half_width(), 50.0);
        assert_eq!(size.half_height(), 25.0);
        assert!(!size.is_zero());
        assert!(Size::new(0.0, 10.0).is_zero());
    }
}
