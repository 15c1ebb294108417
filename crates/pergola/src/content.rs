//! Intrinsic size providers.
//!
//! Content is whatever gives a widget a natural size: a decoded image, a
//! measured text run. The layout core only ever asks for the natural size;
//! rendering the content is a native-backend concern.

use std::{fmt::Debug, path::Path};

use geom::Size;
use image::DynamicImage;

use crate::error::{Error, Result};

/// Something with a natural, unconstrained size.
///
/// Content is immutable once loaded. The natural size is reported in
/// device-independent units at scale factor 1; the rehint engine applies
/// the widget's scale.
pub trait Content: Debug + Send {
    /// The natural size of the content absent any container constraint.
    fn natural_size(&self) -> Size;
}

/// Content with a known, fixed natural size. Used for measured text runs
/// and as a stand-in in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedContent {
    /// Natural size in device-independent units.
    size: Size,
}

impl FixedContent {
    /// Construct content with the given natural size.
    pub fn new(w: f64, h: f64) -> Self {
        Self {
            size: Size::new(w, h),
        }
    }
}

impl Content for FixedContent {
    fn natural_size(&self) -> Size {
        self.size
    }
}

/// A decoded image.
#[derive(Debug)]
pub struct ImageContent {
    /// Decoded pixel data.
    image: DynamicImage,
}

impl ImageContent {
    /// Wrap an already-decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an image from an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|e| Error::Content(e.to_string()))?;
        Ok(Self { image })
    }

    /// Load and decode an image from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path).map_err(|e| Error::Content(e.to_string()))?;
        Ok(Self { image })
    }
}

impl Content for ImageContent {
    fn natural_size(&self) -> Size {
        Size::new(f64::from(self.image.width()), f64::from(self.image.height()))
    }
}
