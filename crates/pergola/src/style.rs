//! Per-widget style attributes and fixed/flexible resolution.
//!
//! `Style` is the declarative side of the layout system. Values are
//! validated at this boundary so the layout math never sees malformed
//! input: setters reject negative or non-finite values with a warning and
//! keep the previous value, per the non-fatal configuration error policy.

use geom::{Direction, Inset};
use tracing::warn;

/// Cross-axis placement of children within a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignItems {
    /// Pack children against the cross-axis start.
    Start,
    /// Center children on the cross axis.
    Center,
    /// Pack children against the cross-axis end.
    End,
    /// Expand children to fill the available cross space.
    #[default]
    Stretch,
}

/// Whether a styled dimension is pinned or computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dim {
    /// Explicitly set to a pixel value.
    Fixed(f64),
    /// Computed from content and available space.
    Flexible,
}

/// Style attributes recognized by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Explicit width in device-independent pixels.
    width: Option<f64>,
    /// Explicit height in device-independent pixels.
    height: Option<f64>,
    /// Weight for surplus-space distribution. Zero means non-flexible.
    flex: f64,
    /// Primary axis for children.
    direction: Direction,
    /// Cross-axis placement for children.
    align_items: AlignItems,
    /// Outer margin.
    margin: Inset,
    /// Content scale factor applied to intrinsic sizes.
    scale: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            flex: 0.0,
            direction: Direction::default(),
            align_items: AlignItems::default(),
            margin: Inset::default(),
            scale: 1.0,
        }
    }
}

/// True for values usable as an extent: finite and non-negative.
fn valid_extent(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl Style {
    /// Construct a default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit width, if set.
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Explicit height, if set.
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Flex factor.
    pub fn flex(&self) -> f64 {
        self.flex
    }

    /// Primary axis for children.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cross-axis placement for children.
    pub fn align_items(&self) -> AlignItems {
        self.align_items
    }

    /// Outer margin.
    pub fn margin(&self) -> Inset {
        self.margin
    }

    /// Content scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Resolve the width dimension.
    pub fn resolved_width(&self) -> Dim {
        match self.width {
            Some(w) => Dim::Fixed(w),
            None => Dim::Flexible,
        }
    }

    /// Resolve the height dimension.
    pub fn resolved_height(&self) -> Dim {
        match self.height {
            Some(h) => Dim::Fixed(h),
            None => Dim::Flexible,
        }
    }

    /// Set an explicit width.
    pub fn with_width(mut self, width: f64) -> Self {
        if valid_extent(width) {
            self.width = Some(width);
        } else {
            warn!(width, "ignoring invalid width");
        }
        self
    }

    /// Set an explicit height.
    pub fn with_height(mut self, height: f64) -> Self {
        if valid_extent(height) {
            self.height = Some(height);
        } else {
            warn!(height, "ignoring invalid height");
        }
        self
    }

    /// Clear any explicit width.
    pub fn without_width(mut self) -> Self {
        self.width = None;
        self
    }

    /// Clear any explicit height.
    pub fn without_height(mut self) -> Self {
        self.height = None;
        self
    }

    /// Set the flex factor.
    pub fn with_flex(mut self, flex: f64) -> Self {
        if valid_extent(flex) {
            self.flex = flex;
        } else {
            warn!(flex, "ignoring invalid flex factor");
        }
        self
    }

    /// Set the primary axis for children.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set cross-axis placement for children.
    pub fn with_align_items(mut self, align_items: AlignItems) -> Self {
        self.align_items = align_items;
        self
    }

    /// Set the outer margin. Sides must be finite and non-negative.
    pub fn with_margin(mut self, margin: Inset) -> Self {
        let sides = [margin.top, margin.right, margin.bottom, margin.left];
        if sides.iter().all(|side| valid_extent(*side)) {
            self.margin = margin;
        } else {
            warn!(?margin, "ignoring invalid margin");
        }
        self
    }

    /// Set the content scale factor. Must be finite and positive.
    pub fn with_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        } else {
            warn!(scale, "ignoring invalid scale factor");
        }
        self
    }
}
