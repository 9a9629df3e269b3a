//! Telea fast-marching inpainting through the `inpaint` crate.
//!
//! Planar channels are packed three at a time into an RGBA `f32` buffer (alpha
//! fixed at 1), inpainted against a `GrayImage` region mask and unpacked again.
//! Only region pixels are copied back, so known samples stay bit-identical.

use ::image::{GrayImage, Luma, Rgba, Rgba32FImage};
use inpaint::prelude::*;

use super::RegionFiller;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::mask::Mask;

/// Neighbourhood radius used when none is configured.
pub const DEFAULT_INPAINT_RADIUS: usize = 3;

/// Largest accepted neighbourhood radius.
pub const MAX_INPAINT_RADIUS: usize = 256;

const CHANNELS_PER_PASS: usize = 3;
const FILL: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleaFiller {
    pub radius: usize,
}

impl Default for TeleaFiller {
    fn default() -> Self {
        Self {
            radius: DEFAULT_INPAINT_RADIUS,
        }
    }
}

impl TeleaFiller {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 || self.radius > MAX_INPAINT_RADIUS {
            return Err(Error::Inpaint(format!(
                "inpaint radius must be in 1..={MAX_INPAINT_RADIUS}, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

impl RegionFiller for TeleaFiller {
    fn fill(&self, image: &Image, region: &Mask) -> Result<Image> {
        self.validate()?;
        if region.height() != image.height() || region.width() != image.width() {
            return Err(Error::MaskShape {
                image_height: image.height(),
                image_width: image.width(),
                mask_height: region.height(),
                mask_width: region.width(),
            });
        }
        if let Some(pos) = image.data().iter().position(|v| !v.is_finite()) {
            return Err(Error::Inpaint(format!(
                "image contains non-finite sample at offset {pos}"
            )));
        }

        let fill_count = region.as_slice().iter().filter(|&&fill| fill).count();
        // Nothing to fill, or no valued pixel for the front to start from.
        if fill_count == 0 || fill_count == region.len() {
            return Ok(image.clone());
        }

        let width = u32::try_from(image.width())
            .map_err(|_| Error::Inpaint(format!("width {} too large", image.width())))?;
        let height = u32::try_from(image.height())
            .map_err(|_| Error::Inpaint(format!("height {} too large", image.height())))?;
        let radius = self
            .radius
            .try_into()
            .map_err(|_| Error::Inpaint(format!("radius {} too large", self.radius)))?;

        let row = image.width();
        let mask = GrayImage::from_fn(width, height, |x, y| {
            let fill = region.as_slice()[y as usize * row + x as usize];
            Luma([if fill { FILL } else { 0 }])
        });

        let mut output = image.clone();
        for first in (0..image.channels()).step_by(CHANNELS_PER_PASS) {
            let group = first..(first + CHANNELS_PER_PASS).min(image.channels());

            let mut buffer = Rgba32FImage::from_fn(width, height, |x, y| {
                let idx = y as usize * row + x as usize;
                let mut pixel = [0.0, 0.0, 0.0, 1.0];
                for (slot, c) in group.clone().enumerate() {
                    pixel[slot] = image.plane(c)[idx];
                }
                Rgba(pixel)
            });

            buffer
                .telea_inpaint(&mask, radius)
                .map_err(|e| Error::Inpaint(format!("{e:?}")))?;

            for (slot, c) in group.enumerate() {
                let plane = output.plane_mut(c);
                for (idx, _) in region.as_slice().iter().enumerate().filter(|(_, fill)| **fill) {
                    let value = buffer.get_pixel((idx % row) as u32, (idx / row) as u32)[slot];
                    if !value.is_finite() {
                        return Err(Error::Inpaint(format!(
                            "non-finite value at pixel {idx} of channel {c}"
                        )));
                    }
                    plane[idx] = value;
                }
            }
        }

        tracing::debug!(
            "Telea inpainting filled {} pixels in {} channels (radius {})",
            fill_count,
            image.channels(),
            self.radius
        );

        Ok(output)
    }
}
