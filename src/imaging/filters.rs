//! Filter registry: one pure transform per [`TaskName`].
//!
//! | Task | Transform |
//! |---|---|
//! | `resize` | Lanczos3 to [`resize_dimensions`] |
//! | `grayscale` | luminance, alpha kept when present |
//! | `rotate` | EXIF orientation applied to pixels, no-op without metadata |
//! | `blur` | Gaussian blur with configurable sigma |
//!
//! Dispatch goes through the static [`REGISTRY`] table. Adding a filter means
//! adding a `TaskName` variant and a table row.

use super::backend::DecodedImage;
use super::calculations::resize_dimensions;
use super::orientation::apply_orientation;
use super::params::FilterParams;
use crate::config::TaskName;
use image::imageops::FilterType;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid {task} parameter: {message}")]
    InvalidParameter { task: TaskName, message: String },
    #[error("No filter registered for task {0}")]
    Unregistered(TaskName),
}

/// Signature shared by every filter.
pub type FilterFn = fn(DecodedImage, &FilterParams) -> Result<DecodedImage, FilterError>;

/// Task name → transform.
pub static REGISTRY: &[(TaskName, FilterFn)] = &[
    (TaskName::Resize, resize),
    (TaskName::Grayscale, grayscale),
    (TaskName::Rotate, rotate),
    (TaskName::Blur, blur),
];

/// Look up the transform for a task.
pub fn filter_for(task: TaskName) -> Option<FilterFn> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == task)
        .map(|(_, f)| *f)
}

/// Apply the named task to an image.
pub fn apply(
    task: TaskName,
    image: DecodedImage,
    params: &FilterParams,
) -> Result<DecodedImage, FilterError> {
    let filter = filter_for(task).ok_or(FilterError::Unregistered(task))?;
    filter(image, params)
}

fn resize(image: DecodedImage, params: &FilterParams) -> Result<DecodedImage, FilterError> {
    let (width, height) = resize_dimensions(image.dimensions(), &params.resize).ok_or_else(|| {
        FilterError::InvalidParameter {
            task: TaskName::Resize,
            message: format!(
                "cannot resize {}x{} to {:?}x{:?}",
                image.image.width(),
                image.image.height(),
                params.resize.width,
                params.resize.height
            ),
        }
    })?;
    let resized = image.image.resize_exact(width, height, FilterType::Lanczos3);
    Ok(DecodedImage::with_orientation(resized, image.orientation))
}

fn grayscale(image: DecodedImage, _params: &FilterParams) -> Result<DecodedImage, FilterError> {
    Ok(DecodedImage::with_orientation(
        image.image.grayscale(),
        image.orientation,
    ))
}

/// Bakes the EXIF orientation into the pixels. The output is written without
/// any EXIF block, so the rest of the source metadata is not carried over and
/// the result displays upright with orientation treated as 1.
fn rotate(image: DecodedImage, _params: &FilterParams) -> Result<DecodedImage, FilterError> {
    match image.orientation {
        Some(orientation) => Ok(DecodedImage::new(apply_orientation(
            image.image,
            orientation,
        ))),
        None => Ok(image),
    }
}

fn blur(image: DecodedImage, params: &FilterParams) -> Result<DecodedImage, FilterError> {
    let sigma = params.blur.sigma;
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FilterError::InvalidParameter {
            task: TaskName::Blur,
            message: format!("sigma must be positive, got {sigma}"),
        });
    }
    Ok(DecodedImage::with_orientation(
        image.image.blur(sigma),
        image.orientation,
    ))
}
