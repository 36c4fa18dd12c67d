//! Output file naming and collision detection.
//!
//! Every output is named `<stem>.<format-extension>`, so the source extension
//! is replaced, never appended to:
//! - `photo.png` → `photo.webp`
//! - `photo.tar.png` → `photo.tar.webp`
//! - `README` → `README.webp`
//!
//! ## Collisions
//!
//! Two sources can map to the same output (`photo.jpg` and `photo.png` both
//! become `photo.webp`). Names are claimed in discovery order: the first
//! record keeps the name, later ones are reported as collisions and are not
//! processed. Comparison is case-insensitive so the outcome does not depend
//! on whether the output filesystem folds case.

use crate::config::FormatName;
use std::collections::HashMap;
use std::path::Path;

/// Output file name for a source file name.
pub fn output_name(relative_name: &str, format: FormatName) -> String {
    let stem = Path::new(relative_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| relative_name.to_string());
    format!("{stem}.{}", format.extension())
}

/// Where a record's output will go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPlan {
    /// The record owns this output name.
    Claimed(String),
    /// Another record, earlier in discovery order, already owns `name`.
    Collision { name: String, claimed_by: String },
}

/// Assign output names to source names, in order.
///
/// Returns one plan per input, in the same order.
pub fn plan_outputs<'a>(
    relative_names: impl IntoIterator<Item = &'a str>,
    format: FormatName,
) -> Vec<OutputPlan> {
    let mut claimed: HashMap<String, String> = HashMap::new();
    relative_names
        .into_iter()
        .map(|source| {
            let name = output_name(source, format);
            let key = name.to_lowercase();
            match claimed.get(&key) {
                Some(owner) => OutputPlan::Collision {
                    name,
                    claimed_by: owner.clone(),
                },
                None => {
                    claimed.insert(key, source.to_string());
                    OutputPlan::Claimed(name)
                }
            }
        })
        .collect()
}
