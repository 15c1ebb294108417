use super::{Inset, Point, Size};

/// A rectangle with a top-left location and an extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width in device-independent pixels.
    pub w: f64,
    /// Height in device-independent pixels.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from a location and extent.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The extent of this rectangle.
    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    /// True if the point falls within the rectangle (inclusive of the
    /// top-left edge, exclusive of the bottom-right).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.tl.x + self.w && p.y >= self.tl.y && p.y < self.tl.y + self.h
    }

    /// Return the rectangle shrunk by an inset on all four sides. Extents
    /// never drop below zero.
    pub fn shrink(&self, inset: &Inset) -> Self {
        Self {
            tl: self.tl.translate(inset.left, inset.top),
            w: (self.w - inset.horizontal()).max(0.0),
            h: (self.h - inset.vertical()).max(0.0),
        }
    }

    /// Return the rectangle shifted by an offset.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            tl: self.tl.translate(dx, dy),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_point() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains_point(Point::new(10.0, 10.0)));
        assert!(r.contains_point(Point::new(14.9, 14.9)));
        assert!(!r.contains_point(Point::new(15.0, 10.0)));
    }

    #[test]
    fn shrink_clamps_to_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let shrunk = r.shrink(&Inset::uniform(6.0));
        assert_eq!(shrunk.w, 0.0);
        assert_eq!(shrunk.h, 0.0);
        assert_eq!(shrunk.tl, Point::new(6.0, 6.0));
    }
}
