//! EXIF orientation lookup and correction.
//!
//! Only the orientation tag is read. Any failure (no EXIF block, truncated
//! block, unexpected value type, value outside 1-8) yields `None`: a file is
//! never rejected because of its metadata.

use super::params::Orientation;
use exif::{In, Reader, Tag};
use image::DynamicImage;
use std::io::Cursor;

/// Read the primary-image orientation from an encoded file's bytes.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    let value = field.value.get_uint(0)?;
    Orientation::from_exif(value)
}

/// Transform stored pixels so they display upright.
pub fn apply_orientation(image: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => image,
        Orientation::FlipHorizontal => image.fliph(),
        Orientation::Rotate180 => image.rotate180(),
        Orientation::FlipVertical => image.flipv(),
        Orientation::Transpose => image.rotate90().fliph(),
        Orientation::Rotate90 => image.rotate90(),
        Orientation::Transverse => image.rotate270().fliph(),
        Orientation::Rotate270 => image.rotate270(),
    }
}
