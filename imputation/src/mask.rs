//! Binary presence masks.
//!
//! A mask is shared by every channel of an image. `true` marks a known pixel,
//! `false` a pixel that has to be imputed.

use crate::error::{Error, Result};
use crate::image::Image;

/// Values above this are treated as "present" when building a mask from floats.
const PRESENT_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    known: Vec<bool>,
    width: usize,
    height: usize,
}

impl Mask {
    pub fn new(width: usize, height: usize, known: Vec<bool>) -> Result<Self> {
        if known.len() != width * height {
            return Err(Error::DataLength {
                expected: width * height,
                got: known.len(),
            });
        }
        Ok(Self {
            known,
            width,
            height,
        })
    }

    /// Builds a mask from 0/1 samples (e.g. a float tensor). Values > 0.5 are known.
    pub fn from_values(width: usize, height: usize, values: &[f32]) -> Result<Self> {
        Self::new(
            width,
            height,
            values.iter().map(|&v| v > PRESENT_THRESHOLD).collect(),
        )
    }

    pub fn all_known(width: usize, height: usize) -> Self {
        Self {
            known: vec![true; width * height],
            width,
            height,
        }
    }

    pub fn all_unknown(width: usize, height: usize) -> Self {
        Self {
            known: vec![false; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    #[inline]
    pub fn is_known(&self, idx: usize) -> bool {
        self.known[idx]
    }

    #[inline]
    pub fn is_known_xy(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.known[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, known: bool) {
        debug_assert!(x < self.width && y < self.height);
        self.known[y * self.width + x] = known;
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.known
    }

    pub fn unknown_count(&self) -> usize {
        self.known.iter().filter(|&&k| !k).count()
    }

    /// Flattened positions of unknown pixels, ascending.
    pub fn unknown_indices(&self) -> Vec<usize> {
        self.known
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| (!k).then_some(i))
            .collect()
    }

    /// Swaps known and unknown.
    pub fn complement(&self) -> Self {
        Self {
            known: self.known.iter().map(|&k| !k).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Fails unless the mask covers exactly the image's spatial extent.
    pub fn check_matches(&self, image: &Image) -> Result<()> {
        if self.height != image.height() || self.width != image.width() {
            return Err(Error::MaskShape {
                image_height: image.height(),
                image_width: image.width(),
                mask_height: self.height,
                mask_width: self.width,
            });
        }
        Ok(())
    }
}

/// A batch of masks, one per image, all of the same size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaskBatch {
    masks: Vec<Mask>,
}

impl MaskBatch {
    pub fn from_masks(masks: Vec<Mask>) -> Result<Self> {
        if let Some(first) = masks.first() {
            let (width, height) = (first.width(), first.height());
            for (index, mask) in masks.iter().enumerate() {
                if mask.width() != width || mask.height() != height {
                    return Err(Error::BatchMaskShape {
                        index,
                        height,
                        width,
                        actual_height: mask.height(),
                        actual_width: mask.width(),
                    });
                }
            }
        }
        Ok(Self { masks })
    }

    /// Builds `len` masks from (B, H, W) float samples.
    pub fn from_values(len: usize, width: usize, height: usize, values: &[f32]) -> Result<Self> {
        let plane = width * height;
        if values.len() != len * plane {
            return Err(Error::DataLength {
                expected: len * plane,
                got: values.len(),
            });
        }
        let masks = (0..len)
            .map(|i| Mask::from_values(width, height, &values[i * plane..(i + 1) * plane]))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { masks })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &Mask {
        &self.masks[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }
}
