//! Batch orchestration.
//!
//! Items are independent: each image/mask pair is copied out of the batch,
//! imputed on its own, and stacked back. No state is shared between items.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::{Image, ImageBatch};
use crate::mask::{Mask, MaskBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Process items on the rayon thread pool.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl BatchOptions {
    pub fn sequential() -> Self {
        Self { parallel: false }
    }
}

/// Applies `impute_one(index, image, mask)` to every item of the batch.
///
/// On failure the error of the lowest failing index is returned and no
/// partial output is produced.
pub fn impute_batch_with<F>(
    images: &ImageBatch,
    masks: &MaskBatch,
    options: &BatchOptions,
    impute_one: F,
) -> Result<ImageBatch>
where
    F: Fn(usize, &Image, &Mask) -> Result<Image> + Sync,
{
    check_batch(images, masks)?;

    let run = |index: usize| -> Result<Image> {
        let image = images.image(index);
        let mask = masks.get(index);
        let filled = impute_one(index, &image, mask)?;
        debug_assert_eq!(filled.shape(), image.shape());
        Ok(filled)
    };

    let results: Vec<Result<Image>> = if options.parallel {
        (0..images.len()).into_par_iter().map(run).collect()
    } else {
        (0..images.len()).map(run).collect()
    };

    let filled = results.into_iter().collect::<Result<Vec<_>>>()?;

    tracing::info!(
        "Imputed batch of {} images ({}, parallel: {})",
        images.len(),
        images.image_shape(),
        options.parallel
    );

    if filled.is_empty() {
        return ImageBatch::new(0, images.image_shape(), Vec::new());
    }
    ImageBatch::from_images(filled)
}

fn check_batch(images: &ImageBatch, masks: &MaskBatch) -> Result<()> {
    if images.len() != masks.len() {
        return Err(Error::BatchLength {
            images: images.len(),
            masks: masks.len(),
        });
    }
    let shape = images.image_shape();
    for (index, mask) in masks.iter().enumerate() {
        if mask.height() != shape.height || mask.width() != shape.width {
            return Err(Error::BatchMaskShape {
                index,
                height: shape.height,
                width: shape.width,
                actual_height: mask.height(),
                actual_width: mask.width(),
            });
        }
    }
    Ok(())
}
