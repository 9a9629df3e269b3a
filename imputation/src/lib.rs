//! Imputation - filling masked-out image pixels with plausible values.
//!
//! Used as a baseline/occlusion step by attribution methods that need to know
//! what an image looks like with some pixels "absent". Two strategies share
//! the [`Imputer`] interface:
//!
//! - [`LinearSystemImputer`]: noisy linear imputation. Each unknown pixel is
//!   tied to a stencil-weighted combination of its neighbours; the resulting
//!   sparse system is solved directly and Gaussian noise is added.
//! - [`InpaintImputer`]: delegates to a [`RegionFiller`], by default the
//!   Telea fast-marching inpainting routine.
//!
//! Images are planar (C, H, W) `f32` buffers; masks are (H, W) with `true`
//! for known pixels and are shared by all channels.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use imputation::{Image, ImageShape, Mask, NoiseConfig, Stencil};
//!
//! let image = Image::new(ImageShape::new(3, 32, 32), data)?;
//! let mask = Mask::from_values(32, 32, &mask_values)?;
//!
//! let filled = imputation::impute(&image, &mask, NoiseConfig::new(0.01), &Stencil::default())?;
//! ```

pub mod batch;
pub mod config;
mod error;
mod image;
mod imputer;
pub mod inpaint;
pub mod linear;
mod mask;
mod stencil;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchOptions;
pub use config::{ImputerConfig, Strategy};
pub use error::{Error, Result};
pub use image::{Image, ImageBatch, ImageShape};
pub use imputer::Imputer;
pub use inpaint::{InpaintImputer, MAX_INPAINT_RADIUS, RegionFiller, TeleaFiller};
pub use linear::{LinearSystemImputer, NoiseConfig};
pub use mask::{Mask, MaskBatch};
pub use stencil::{MAX_TAP_OFFSET, Stencil, StencilTap};

/// Imputes one (C, H, W) image with the linear-system strategy.
pub fn impute(image: &Image, mask: &Mask, noise: NoiseConfig, stencil: &Stencil) -> Result<Image> {
    LinearSystemImputer::new(noise, stencil.clone()).impute(image, mask)
}

/// Imputes a (B, C, H, W) batch with the linear-system strategy.
///
/// Equivalent to calling [`impute`] per item; with a seeded [`NoiseConfig`]
/// item `i` uses seed `seed + i`.
pub fn impute_batch(
    images: &ImageBatch,
    masks: &MaskBatch,
    noise: NoiseConfig,
    stencil: &Stencil,
) -> Result<ImageBatch> {
    LinearSystemImputer::new(noise, stencil.clone()).impute_batch(images, masks)
}

/// Inpaints a (B, C, H, W) batch with the default Telea filler.
pub fn inpaint_batch(images: &ImageBatch, masks: &MaskBatch) -> Result<ImageBatch> {
    InpaintImputer::<TeleaFiller>::default().impute_batch(images, masks)
}
