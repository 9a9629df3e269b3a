//! Noisy linear imputation.
//!
//! Unknown pixels are recovered by solving one sparse linear system per image:
//! each unknown pixel must equal the stencil-weighted combination of its
//! neighbours. Known neighbours feed the right-hand side, unknown neighbours
//! couple variables, neighbours outside the image are dropped. The system is
//! solved directly and optional Gaussian noise is added to the filled values.
//!
//! # Pipeline
//!
//! 1. [`VariableMap`]: dense ids for the unknown pixels
//! 2. [`assemble`]: triplet accumulation into a `faer` compressed sparse matrix
//! 3. [`solve`]: direct sparse LU solve for all channels at once
//! 4. reinsertion of `solution + noise * N(0, 1)` into a copy of the input

pub mod offset;
pub mod solve;
pub mod system;


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

pub use offset::{ShiftedIndices, shift_indices};
pub use solve::solve;
pub use system::{LinearSystem, VariableMap, assemble};

use crate::batch::{BatchOptions, impute_batch_with};
use crate::error::{Error, Result};
use crate::image::{Image, ImageBatch};
use crate::imputer::Imputer;
use crate::mask::{Mask, MaskBatch};
use crate::stencil::Stencil;

/// Default noise magnitude added to imputed pixels.
pub const DEFAULT_NOISE: f32 = 0.01;

/// Gaussian noise added to every imputed sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Standard deviation of the added noise. Zero disables sampling.
    pub magnitude: f32,
    /// Fixed RNG seed. Batch item `i` uses `seed + i`.
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            magnitude: DEFAULT_NOISE,
            seed: None,
        }
    }
}

impl NoiseConfig {
    pub fn none() -> Self {
        Self {
            magnitude: 0.0,
            seed: None,
        }
    }

    pub fn new(magnitude: f32) -> Self {
        Self {
            magnitude,
            seed: None,
        }
    }

    pub fn seeded(magnitude: f32, seed: u64) -> Self {
        Self {
            magnitude,
            seed: Some(seed),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.magnitude != 0.0
    }

    pub fn validate(&self) -> Result<()> {
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "noise magnitude must be finite and non-negative, got {}",
                self.magnitude
            )));
        }
        Ok(())
    }
}

/// Fills masked pixels by solving a sparse neighbourhood-smoothness system.
#[derive(Debug, Clone, Default)]
pub struct LinearSystemImputer {
    pub noise: NoiseConfig,
    pub stencil: Stencil,
    pub batch: BatchOptions,
}

impl LinearSystemImputer {
    pub fn new(noise: NoiseConfig, stencil: Stencil) -> Self {
        Self {
            noise,
            stencil,
            batch: BatchOptions::default(),
        }
    }

    pub fn with_batch_options(mut self, batch: BatchOptions) -> Self {
        self.batch = batch;
        self
    }

    /// Imputes batch item `index`; the index only selects the noise seed.
    fn impute_item(&self, index: usize, image: &Image, mask: &Mask) -> Result<Image> {
        self.noise.validate()?;
        let magnitude = self.noise.magnitude;
        if !self.noise.is_enabled() {
            return impute_image(image, mask, &self.stencil, || 0.0);
        }
        match self.noise.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                impute_image(image, mask, &self.stencil, || gaussian(&mut rng, magnitude))
            }
            None => {
                let mut rng = rand::rng();
                impute_image(image, mask, &self.stencil, || gaussian(&mut rng, magnitude))
            }
        }
    }
}

impl Imputer for LinearSystemImputer {
    fn impute(&self, image: &Image, mask: &Mask) -> Result<Image> {
        self.impute_item(0, image, mask)
    }

    fn impute_batch(&self, images: &ImageBatch, masks: &MaskBatch) -> Result<ImageBatch> {
        impute_batch_with(images, masks, &self.batch, |index, image, mask| {
            self.impute_item(index, image, mask)
        })
    }
}

#[inline]
fn gaussian<R: Rng + ?Sized>(rng: &mut R, magnitude: f32) -> f32 {
    let sample: f32 = rng.sample(StandardNormal);
    magnitude * sample
}

/// Imputes one image. `noise` is called once per imputed sample, channel by
/// channel, and its value is added to the solved value.
pub fn impute_image(
    image: &Image,
    mask: &Mask,
    stencil: &Stencil,
    mut noise: impl FnMut() -> f32,
) -> Result<Image> {
    mask.check_matches(image)?;

    let variables = VariableMap::from_mask(mask);
    if variables.is_empty() {
        return Ok(image.clone());
    }

    let system = assemble(image, mask, &variables, stencil)?;
    let solution = solve(&system)?;

    let channels = image.channels();
    let mut output = image.clone();
    for c in 0..channels {
        let plane = output.plane_mut(c);
        for (id, &pos) in variables.positions().iter().enumerate() {
            plane[pos] = solution[id * channels + c] as f32 + noise();
        }
    }

    tracing::debug!(
        "Imputed {} of {} pixels ({} channels)",
        variables.len(),
        mask.len(),
        channels
    );

    Ok(output)
}
