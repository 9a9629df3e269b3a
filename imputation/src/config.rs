//! Imputer configuration.
//!
//! Configuration can be built in code or loaded from YAML/JSON:
//!
//! ```yaml
//! strategy: linear
//! noise:
//!   magnitude: 0.01
//!   seed: 7
//! inpaint_radius: 3
//! parallel: true
//! ```
//!
//! `stencil` is optional and defaults to the 8-connected stencil.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use common::ConfigFormat;

use crate::batch::BatchOptions;
use crate::error::{Error, Result};
use crate::imputer::Imputer;
use crate::inpaint::{DEFAULT_INPAINT_RADIUS, InpaintImputer, MAX_INPAINT_RADIUS, TeleaFiller};
use crate::linear::{LinearSystemImputer, NoiseConfig};
use crate::stencil::Stencil;

/// Which reconstruction strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    /// Sparse linear system over unknown pixels.
    #[default]
    Linear,
    /// Fast-marching inpainting.
    Inpaint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputerConfig {
    pub strategy: Strategy,
    /// Noise added by the linear strategy. Ignored by inpainting.
    pub noise: NoiseConfig,
    /// Neighbour weights for the linear strategy.
    pub stencil: Stencil,
    /// Neighbourhood radius for inpainting.
    pub inpaint_radius: usize,
    /// Process batch items in parallel.
    pub parallel: bool,
}

impl Default for ImputerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            noise: NoiseConfig::default(),
            stencil: Stencil::default(),
            inpaint_radius: DEFAULT_INPAINT_RADIUS,
            parallel: true,
        }
    }
}

impl ImputerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_text(&text, format)?;

        tracing::info!(
            "Loaded imputer config from {}: strategy={}",
            path.display(),
            config.strategy
        );

        Ok(config)
    }

    pub fn from_text(text: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Yaml => {
                serde_yml::from_str(text).map_err(|e| Error::ConfigParse(e.to_string()))?
            }
            ConfigFormat::Json => {
                serde_json::from_str(text).map_err(|e| Error::ConfigParse(e.to_string()))?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.noise.validate()?;
        if self.inpaint_radius == 0 || self.inpaint_radius > MAX_INPAINT_RADIUS {
            return Err(Error::InvalidConfig(format!(
                "inpaint_radius must be in 1..={MAX_INPAINT_RADIUS}, got {}",
                self.inpaint_radius
            )));
        }
        if self.strategy == Strategy::Inpaint && self.noise.is_enabled() {
            tracing::warn!(
                "Noise magnitude {} is ignored by the inpaint strategy",
                self.noise.magnitude
            );
        }
        Ok(())
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            parallel: self.parallel,
        }
    }

    /// Builds the configured imputer.
    pub fn build(&self) -> Result<Box<dyn Imputer>> {
        self.validate()?;
        let imputer: Box<dyn Imputer> = match self.strategy {
            Strategy::Linear => Box::new(
                LinearSystemImputer::new(self.noise, self.stencil.clone())
                    .with_batch_options(self.batch_options()),
            ),
            Strategy::Inpaint => Box::new(
                InpaintImputer::new(TeleaFiller::new(self.inpaint_radius))
                    .with_batch_options(self.batch_options()),
            ),
        };
        tracing::debug!("Built {} imputer", self.strategy);
        Ok(imputer)
    }
}
