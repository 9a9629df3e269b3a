//! The common imputation interface.

use crate::batch::{BatchOptions, impute_batch_with};
use crate::error::Result;
use crate::image::{Image, ImageBatch};
use crate::mask::{Mask, MaskBatch};

/// Fills the unknown pixels of an image given its presence mask.
///
/// Implementations must leave known pixels bit-identical and return an image
/// of the input's shape.
pub trait Imputer: Send + Sync {
    /// Imputes a single (C, H, W) image with an (H, W) mask.
    fn impute(&self, image: &Image, mask: &Mask) -> Result<Image>;

    /// Imputes a (B, C, H, W) batch with (B, H, W) masks.
    ///
    /// The default maps [`Imputer::impute`] over the batch in parallel.
    fn impute_batch(&self, images: &ImageBatch, masks: &MaskBatch) -> Result<ImageBatch> {
        impute_batch_with(images, masks, &BatchOptions::default(), |_, image, mask| {
            self.impute(image, mask)
        })
    }
}

impl<T: Imputer + ?Sized> Imputer for Box<T> {
    fn impute(&self, image: &Image, mask: &Mask) -> Result<Image> {
        (**self).impute(image, mask)
    }

    fn impute_batch(&self, images: &ImageBatch, masks: &MaskBatch) -> Result<ImageBatch> {
        (**self).impute_batch(images, masks)
    }
}
