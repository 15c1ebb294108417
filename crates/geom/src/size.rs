use super::{Point, Rect};

/// A `Size` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in device-independent pixels.
    pub w: f64,
    /// Height in device-independent pixels.
    pub h: f64,
}

impl Size {
    /// Construct a size.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// A zero-valued size.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The area of this size.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// True if either dimension is zero or below.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Return the size multiplied by a scale factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            w: self.w * factor,
            h: self.h * factor,
        }
    }

    /// Return a `Rect` with the same dimensions and a location at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this size can completely enclose the target size in both
    /// dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f64, f64)> for Size {
    fn from(v: (f64, f64)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled() {
        assert_eq!(Size::new(60.0, 40.0).scaled(2.0), Size::new(120.0, 80.0));
        assert_eq!(Size::new(60.0, 40.0).scaled(1.0), Size::new(60.0, 40.0));
    }

    #[test]
    fn contains() {
        assert!(Size::new(10.0, 10.0).contains(&Size::new(10.0, 5.0)));
        assert!(!Size::new(10.0, 10.0).contains(&Size::new(10.1, 5.0)));
    }
}
