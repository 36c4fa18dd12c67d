//! Encoding policy: turn a requested format and optional quality into
//! concrete encoder parameters.
//!
//! - lossy formats use the requested quality, or their default
//!   (jpeg 85, webp 80)
//! - png is lossless and ignores any requested quality
//!
//! Range checking happens earlier in [`BatchConfig::new`](crate::config::BatchConfig::new);
//! resolution itself cannot fail.

use super::params::{Compression, EncodeParams, Quality};
use crate::config::FormatName;

/// Resolve encoder parameters for a batch.
pub fn resolve(format: FormatName, quality: Option<u8>) -> EncodeParams {
    let compression = match format.default_quality() {
        Some(default) => Compression::Lossy(Quality::new(quality.unwrap_or(default))),
        None => Compression::Lossless,
    };
    EncodeParams {
        format,
        compression,
    }
}
