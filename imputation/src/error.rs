//! Error types for imputation operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::image::ImageShape;

/// Errors that can occur while imputing images or loading imputer configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Buffer length mismatch: expected {expected} elements, got {got}")]
    DataLength { expected: usize, got: usize },

    #[error("Image must have at least one channel")]
    ZeroChannels,

    #[error(
        "Mask shape {mask_height}x{mask_width} does not match image spatial shape {image_height}x{image_width}"
    )]
    MaskShape {
        image_height: usize,
        image_width: usize,
        mask_height: usize,
        mask_width: usize,
    },

    #[error("Batch size mismatch: {images} images but {masks} masks")]
    BatchLength { images: usize, masks: usize },

    #[error("Image {index} in batch has shape {actual}, expected {expected}")]
    BatchImageShape {
        index: usize,
        expected: ImageShape,
        actual: ImageShape,
    },

    #[error("Mask {index} in batch is {actual_height}x{actual_width}, expected {height}x{width}")]
    BatchMaskShape {
        index: usize,
        height: usize,
        width: usize,
        actual_height: usize,
        actual_width: usize,
    },

    #[error("Invalid stencil: {0}")]
    InvalidStencil(String),

    #[error("Singular system for {unknowns} unknown pixels: {reason}")]
    SingularMatrix { unknowns: usize, reason: String },

    #[error("Inpainting failed: {0}")]
    Inpaint(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config format error: {0}")]
    ConfigFormat(#[from] common::FileFormatError),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
