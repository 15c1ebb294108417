//! Geometry primitives used across pergola.
//!
//! All values are in device-independent pixels, stored as `f64`. Scaling to
//! physical pixels is the concern of native backends, never of this crate.

/// Four-sided insets (margins).
mod inset;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use inset::Inset;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// Primary axis of a container.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Direction {
    /// Children are laid out left to right.
    Row,
    /// Children are laid out top to bottom.
    #[default]
    Column,
}
