//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the two operations the engine needs from
//! a codec: decode a file into pixels, and encode pixels into an output file.
//! Everything between those two calls (filters, encoding policy) is pure and
//! codec-agnostic.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), statically linked into the
//! binary.

use super::params::{EncodeParams, Orientation};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// A decoded image plus the metadata the filters care about.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// EXIF orientation found in the source, if any was readable.
    pub orientation: Option<Orientation>,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            orientation: None,
        }
    }

    pub fn with_orientation(image: DynamicImage, orientation: Option<Orientation>) -> Self {
        Self { image, orientation }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Trait for image codecs.
///
/// `Sync` so one codec can be shared by the worker pool.
pub trait ImageCodec: Sync {
    /// Read and decode an image file.
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;

    /// Encode an image with the given parameters and write it to `dest`.
    ///
    /// On error nothing is left at `dest`.
    fn encode(
        &self,
        image: &DecodedImage,
        params: &EncodeParams,
        dest: &Path,
    ) -> Result<(), CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::config::FormatName;
    use crate::imaging::params::{Compression, Quality};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mock codec that records operations without touching the filesystem.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    pub struct MockCodec {
        pub image: DynamicImage,
        pub orientation: Option<Orientation>,
        /// File names whose decode should fail.
        pub fail_decode: HashSet<String>,
        /// File names (of the destination) whose encode should fail.
        pub fail_encode: HashSet<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Encode {
            dest: String,
            format: FormatName,
            quality: Option<u8>,
            width: u32,
            height: u32,
        },
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    impl Default for MockCodec {
        fn default() -> Self {
            Self {
                image: DynamicImage::new_rgb8(64, 48),
                orientation: None,
                fail_decode: HashSet::new(),
                fail_encode: HashSet::new(),
                operations: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_decode(names: &[&str]) -> Self {
            Self {
                fail_decode: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn failing_encode(names: &[&str]) -> Self {
            Self {
                fail_encode: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn decode_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Decode(_)))
                .count()
        }
    }

    impl ImageCodec for MockCodec {
        fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
            let name = file_name(path);
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(name.clone()));

            if self.fail_decode.contains(&name) {
                return Err(CodecError::Decode(format!("mock corrupt file {name}")));
            }
            Ok(DecodedImage::with_orientation(
                self.image.clone(),
                self.orientation,
            ))
        }

        fn encode(
            &self,
            image: &DecodedImage,
            params: &EncodeParams,
            dest: &Path,
        ) -> Result<(), CodecError> {
            let name = file_name(dest);
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                dest: name.clone(),
                format: params.format,
                quality: params.quality(),
                width: image.image.width(),
                height: image.image.height(),
            });

            if self.fail_encode.contains(&name) {
                return Err(CodecError::Encode(format!("mock disk full writing {name}")));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_decode() {
        let codec = MockCodec::new();
        let decoded = codec.decode(Path::new("/in/a.png")).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(
            codec.get_operations(),
            vec![RecordedOp::Decode("a.png".into())]
        );
    }

    #[test]
    fn mock_fails_configured_decode() {
        let codec = MockCodec::failing_decode(&["bad.png"]);
        assert!(codec.decode(Path::new("/in/bad.png")).is_err());
        assert!(codec.decode(Path::new("/in/good.png")).is_ok());
        assert_eq!(codec.decode_count(), 2);
    }

    #[test]
    fn mock_records_encode() {
        let codec = MockCodec::new();
        let image = DecodedImage::new(DynamicImage::new_rgb8(10, 20));
        codec
            .encode(
                &image,
                &EncodeParams {
                    format: FormatName::Webp,
                    compression: Compression::Lossy(Quality::new(80)),
                },
                Path::new("/out/a.webp"),
            )
            .unwrap();

        assert!(matches!(
            &codec.get_operations()[0],
            RecordedOp::Encode {
                format: FormatName::Webp,
                quality: Some(80),
                width: 10,
                height: 20,
                ..
            }
        ));
    }
}
