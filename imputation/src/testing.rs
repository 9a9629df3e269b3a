//! Testing utilities for imputation.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::image::{Image, ImageShape};
use crate::mask::Mask;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Single-channel image holding `0, 1, 2, ...` in row-major order.
pub fn ramp_image(height: usize, width: usize) -> Image {
    Image::from_fn(ImageShape::new(1, height, width), |_, y, x| (y * width + x) as f32)
        .expect("valid shape")
}

/// Uniform random samples in [0, 1).
pub fn random_image(shape: ImageShape, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..shape.sample_count()).map(|_| rng.random::<f32>()).collect();
    Image::new(shape, data).expect("valid shape")
}

/// Mask with each pixel unknown with probability `unknown_fraction`.
pub fn random_mask(width: usize, height: usize, unknown_fraction: f64, seed: u64) -> Mask {
    let mut rng = StdRng::seed_from_u64(seed);
    let known = (0..width * height)
        .map(|_| !rng.random_bool(unknown_fraction))
        .collect();
    Mask::new(width, height, known).expect("valid shape")
}

/// All-known mask with a rectangular hole `[x0, x1) x [y0, y1)`.
pub fn mask_with_hole(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Mask {
    let mut mask = Mask::all_known(width, height);
    for y in y0..y1 {
        for x in x0..x1 {
            mask.set(x, y, false);
        }
    }
    mask
}

/// Asserts that every known pixel is bit-identical between `input` and `output`.
pub fn assert_known_unchanged(input: &Image, output: &Image, mask: &Mask) {
    assert_eq!(input.shape(), output.shape());
    for c in 0..input.channels() {
        for (i, (&a, &b)) in input.plane(c).iter().zip(output.plane(c)).enumerate() {
            if mask.is_known(i) {
                assert_eq!(
                    a.to_bits(),
                    b.to_bits(),
                    "known pixel {} of channel {} changed: {} -> {}",
                    i,
                    c,
                    a,
                    b
                );
            }
        }
    }
}
