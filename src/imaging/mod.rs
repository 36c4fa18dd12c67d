//! Image decoding, filtering and encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF, WebP) |
//! | **Orientation** | `kamadak-exif` |
//! | **Filters** | `image` resize, grayscale, blur, rotate/flip |
//! | **Encode** | `jpeg-encoder` (progressive JPEG), `webp` (lossy WebP), `image` PNG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Filters**: The task-name → transform registry
//! - **Encoding**: Format + quality → encoder parameters
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]

pub mod backend;
pub mod calculations;
pub mod encoding;
pub mod filters;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, DecodedImage, ImageCodec};
pub use filters::FilterError;
pub use params::{
    BlurParams, Compression, DEFAULT_RESIZE_BOX, EncodeParams, FilterParams, Orientation,
    Quality, ResizeParams,
};
pub use rust_backend::RustCodec;
