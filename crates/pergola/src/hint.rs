//! Size hints and the rehint engine.
//!
//! Rehinting turns a widget's content and style into a `Hint`: the
//! preferred extent on each axis, whether that extent is a hard size or a
//! flexible minimum, and whether the natural aspect ratio should be
//! preserved when the widget is finally placed. `rehint` is pure: no side
//! effects, deterministic on its inputs.

use crate::{content::Content, style::Style};

/// A preferred extent along one axis.
///
/// A flexible hint carries "at least" semantics: the value is a minimum
/// the layout walker may exceed but never undercut. A fixed hint is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHint {
    /// Preferred extent in device-independent pixels.
    pub value: f64,
    /// True if the extent is a flexible minimum rather than a hard size.
    pub flexible: bool,
}

impl SizeHint {
    /// An exact extent.
    pub fn fixed(value: f64) -> Self {
        Self {
            value,
            flexible: false,
        }
    }

    /// A flexible minimum extent.
    pub fn at_least(value: f64) -> Self {
        Self {
            value,
            flexible: true,
        }
    }
}

/// The output of rehinting a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hint {
    /// Preferred width.
    pub width: SizeHint,
    /// Preferred height.
    pub height: SizeHint,
    /// True if the widget's natural aspect ratio should be preserved when
    /// it is placed into its final box.
    pub preserve_aspect_ratio: bool,
}

impl Hint {
    /// The degenerate hint: zero footprint, nothing to preserve.
    pub fn empty() -> Self {
        Self {
            width: SizeHint::fixed(0.0),
            height: SizeHint::fixed(0.0),
            preserve_aspect_ratio: false,
        }
    }
}

/// Compute a widget's hint from its content and style.
///
/// Absent content yields the degenerate hint unconditionally: no content
/// means zero footprint, regardless of style. Explicit width and height
/// together override the natural aspect ratio; a single explicit dimension
/// derives the other from the content's aspect ratio. Explicit sizes are
/// taken as given and are not multiplied by the scale factor.
pub fn rehint(content: Option<&dyn Content>, style: &Style) -> Hint {
    let Some(content) = content else {
        return Hint::empty();
    };
    let natural = content.natural_size().scaled(style.scale());

    // A flex-styled widget reports derived dimensions as flexible minimums.
    let derived = |value: f64| {
        if style.flex() > 0.0 {
            SizeHint::at_least(value)
        } else {
            SizeHint::fixed(value)
        }
    };

    match (style.width(), style.height()) {
        (Some(w), Some(h)) => Hint {
            width: SizeHint::fixed(w),
            height: SizeHint::fixed(h),
            preserve_aspect_ratio: false,
        },
        (Some(w), None) => {
            let h = if natural.w > 0.0 {
                natural.h * (w / natural.w)
            } else {
                0.0
            };
            Hint {
                width: SizeHint::fixed(w),
                height: derived(h),
                preserve_aspect_ratio: true,
            }
        }
        (None, Some(h)) => {
            let w = if natural.h > 0.0 {
                natural.w * (h / natural.h)
            } else {
                0.0
            };
            Hint {
                width: derived(w),
                height: SizeHint::fixed(h),
                preserve_aspect_ratio: true,
            }
        }
        (None, None) => Hint {
            width: derived(natural.w),
            height: derived(natural.h),
            preserve_aspect_ratio: true,
        },
    }
}
