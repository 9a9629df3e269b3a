//! Inpainting-based imputation.
//!
//! Instead of a custom linear system, the unknown region is handed to a
//! general-purpose [`RegionFiller`]. The default filler is [`TeleaFiller`],
//! Telea fast-marching inpainting from the `inpaint` crate. No noise is added.

mod telea;

#[cfg(test)]
mod tests;

pub use telea::{DEFAULT_INPAINT_RADIUS, MAX_INPAINT_RADIUS, TeleaFiller};

use crate::batch::{BatchOptions, impute_batch_with};
use crate::error::Result;
use crate::image::{Image, ImageBatch};
use crate::imputer::Imputer;
use crate::mask::{Mask, MaskBatch};

/// Reconstructs the pixels of `region` (`true` = fill) from the rest of the image.
pub trait RegionFiller: Send + Sync {
    fn fill(&self, image: &Image, region: &Mask) -> Result<Image>;
}

/// Imputer backed by a [`RegionFiller`].
///
/// The presence mask is complemented at the boundary: absent pixels become the
/// region to fill.
#[derive(Debug, Clone, Default)]
pub struct InpaintImputer<F: RegionFiller = TeleaFiller> {
    filler: F,
    pub batch: BatchOptions,
}

impl<F: RegionFiller> InpaintImputer<F> {
    pub fn new(filler: F) -> Self {
        Self {
            filler,
            batch: BatchOptions::default(),
        }
    }

    pub fn with_batch_options(mut self, batch: BatchOptions) -> Self {
        self.batch = batch;
        self
    }

    pub fn filler(&self) -> &F {
        &self.filler
    }
}

impl<F: RegionFiller> Imputer for InpaintImputer<F> {
    fn impute(&self, image: &Image, mask: &Mask) -> Result<Image> {
        mask.check_matches(image)?;
        let region = mask.complement();
        let filled = self.filler.fill(image, &region)?;
        debug_assert_eq!(filled.shape(), image.shape());
        Ok(filled)
    }

    fn impute_batch(&self, images: &ImageBatch, masks: &MaskBatch) -> Result<ImageBatch> {
        impute_batch_with(images, masks, &self.batch, |_, image, mask| {
            self.impute(image, mask)
        })
    }
}
