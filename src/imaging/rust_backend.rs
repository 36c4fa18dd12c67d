//! Built-in codec. Everything is statically linked into the binary; libwebp
//! is compiled from the sources bundled with `libwebp-sys`.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader`, format sniffed from content |
//! | EXIF orientation | `kamadak-exif` via [`read_orientation`](super::orientation::read_orientation) |
//! | Encode → JPEG | `jpeg-encoder`, progressive |
//! | Encode → WebP | `webp` (libwebp), lossy at the requested quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression, adaptive filtering |
//!
//! Output is encoded fully in memory, written to a hidden `.partial` file next
//! to the destination and renamed into place, so a failed encode never leaves
//! a truncated file behind.

use super::backend::{CodecError, DecodedImage, ImageCodec};
use super::orientation::read_orientation;
use super::params::EncodeParams;
use crate::config::FormatName;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageReader};
use std::borrow::Cow;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Codec backed by the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
        let bytes = fs::read(path)?;
        let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(CodecError::Decode(format!(
                "{} is not a recognized image",
                path.display()
            )));
        }
        let image = reader
            .decode()
            .map_err(|e| CodecError::Decode(format!("{}: {e}", path.display())))?;
        Ok(DecodedImage::with_orientation(
            image,
            read_orientation(&bytes),
        ))
    }

    fn encode(
        &self,
        image: &DecodedImage,
        params: &EncodeParams,
        dest: &Path,
    ) -> Result<(), CodecError> {
        let bytes = match params.format {
            FormatName::Jpeg => encode_jpeg(&image.image, params)?,
            FormatName::Webp => encode_webp(&image.image, params)?,
            FormatName::Png => encode_png(&image.image)?,
        };
        write_atomically(dest, &bytes)
    }
}

/// JPEG carries no alpha: grey images stay single-channel, everything else is RGB.
fn encode_jpeg(image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
    let width = u16::try_from(image.width());
    let height = u16::try_from(image.height());
    let (Ok(width), Ok(height)) = (width, height) else {
        return Err(CodecError::Encode(format!(
            "{}x{} exceeds the JPEG size limit",
            image.width(),
            image.height()
        )));
    };

    let (pixels, color) = if image.color().has_color() {
        (image.to_rgb8().into_raw(), jpeg_encoder::ColorType::Rgb)
    } else {
        (image.to_luma8().into_raw(), jpeg_encoder::ColorType::Luma)
    };

    // jpeg-encoder accepts 1-100
    let quality = params.quality().unwrap_or(85).clamp(1, 100);
    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, quality);
    encoder.set_progressive(params.progressive());
    encoder
        .encode(&pixels, width, height, color)
        .map_err(|e| CodecError::Encode(format!("JPEG: {e}")))?;
    Ok(buf)
}

/// libwebp takes 8-bit RGB or RGBA; grey images are expanded.
fn encode_webp(image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
    let quality = f32::from(params.quality().unwrap_or(80));
    let (width, height) = (image.width(), image.height());

    let (pixels, has_alpha) = if image.color().has_alpha() {
        (image.to_rgba8().into_raw(), true)
    } else {
        (image.to_rgb8().into_raw(), false)
    };
    let encoder = if has_alpha {
        webp::Encoder::from_rgba(&pixels, width, height)
    } else {
        webp::Encoder::from_rgb(&pixels, width, height)
    };
    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| CodecError::Encode(format!("WebP: {e:?}")))?;
    Ok(memory.to_vec())
}

/// PNG keeps 8- and 16-bit integer layouts; float images are narrowed to 8-bit.
fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let normalized = match image {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Borrowed(image),
    };

    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("PNG: {e}")))?;
    Ok(buf)
}

/// Hidden sibling used while an output is being written.
fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.partial"))
}

fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let partial = partial_path(dest);
    let result = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, dest));
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result.map_err(CodecError::from)
}
