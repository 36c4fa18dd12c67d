//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the engine (which decides what each file needs) and the
//! [`backend`](super::backend) (which does the actual pixel and byte work).
//! Tests swap in a mock codec without touching the orchestration.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (0–100). Clamped on construction.
//! - [`Compression`] / [`EncodeParams`]: resolved encoder settings for one batch.
//! - [`ResizeParams`], [`BlurParams`], [`FilterParams`]: tunables for the filters.
//! - [`Orientation`]: EXIF orientation captured at decode time.

use crate::config::FormatName;

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// How the encoder trades size against fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Lossy(Quality),
    Lossless,
}

/// Concrete encoder parameters for a batch, produced by
/// [`resolve`](super::encoding::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: FormatName,
    pub compression: Compression,
}

impl EncodeParams {
    /// Quality value if the format is lossy.
    pub fn quality(&self) -> Option<u8> {
        match self.compression {
            Compression::Lossy(q) => Some(q.value()),
            Compression::Lossless => None,
        }
    }

    /// JPEG output is always progressive.
    pub fn progressive(&self) -> bool {
        self.format == FormatName::Jpeg
    }
}

/// Bounding box used by resize when no target dimensions are configured.
pub const DEFAULT_RESIZE_BOX: (u32, u32) = (128, 128);

/// Target dimensions for the resize filter.
///
/// - both set: exact output size, aspect ratio overridden
/// - one set: the other edge follows the source aspect ratio
/// - neither set: fit inside [`DEFAULT_RESIZE_BOX`], aspect ratio kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Gaussian blur parameters.
///
/// - `sigma`: Standard deviation of the kernel in pixels (higher = smoother)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurParams {
    pub sigma: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { sigma: 2.0 }
    }
}

/// Parameters for every filter; each filter reads only its own part.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterParams {
    pub resize: ResizeParams,
    pub blur: BlurParams,
}

/// EXIF orientation (tag 0x0112), describing how the stored pixels must be
/// transformed to display upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirror across the top-left to bottom-right diagonal.
    Transpose,
    Rotate90,
    /// Mirror across the top-right to bottom-left diagonal.
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF value (1-8). Anything else is unreadable.
    pub fn from_exif(value: u32) -> Option<Self> {
        match value {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::FlipHorizontal),
            3 => Some(Orientation::Rotate180),
            4 => Some(Orientation::FlipVertical),
            5 => Some(Orientation::Transpose),
            6 => Some(Orientation::Rotate90),
            7 => Some(Orientation::Transverse),
            8 => Some(Orientation::Rotate270),
            _ => None,
        }
    }

    pub fn exif_value(self) -> u32 {
        match self {
            Orientation::Normal => 1,
            Orientation::FlipHorizontal => 2,
            Orientation::Rotate180 => 3,
            Orientation::FlipVertical => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90 => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270 => 8,
        }
    }
}
