/// Four-sided insets, used for widget margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inset {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the right edge.
    pub right: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the left edge.
    pub left: f64,
}

impl Inset {
    /// Construct an inset from per-side values.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Construct an inset with the same value on all four sides.
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Total horizontal inset.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}
