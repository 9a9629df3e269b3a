//! Imputes a synthetic gradient image with a rectangular hole.
//!
//! ```text
//! cargo run -p imputation --example impute_synthetic [config.yaml]
//! ```

use common::{LogConfig, setup_logging};
use imputation::{Image, ImageShape, Imputer, ImputerConfig, Mask};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging(&LogConfig::default())?;

    let config = match std::env::args().nth(1) {
        Some(path) => ImputerConfig::from_file(path)?,
        None => ImputerConfig::default(),
    };

    let (height, width) = (64, 48);
    let image = Image::from_fn(ImageShape::new(3, height, width), |c, y, x| {
        (c as f32 + 1.0) * (x + y) as f32 / (width + height) as f32
    })?;
    let mut mask = Mask::all_known(width, height);
    for y in 20..40 {
        for x in 10..30 {
            mask.set(x, y, false);
        }
    }

    let filled = config.build()?.impute(&image, &mask)?;

    let error = mask
        .unknown_indices()
        .into_iter()
        .flat_map(|i| (0..3).map(move |c| (c, i)))
        .map(|(c, i)| (filled.plane(c)[i] - image.plane(c)[i]).abs())
        .fold(0.0f32, f32::max);

    tracing::info!(
        "{} strategy filled {} pixels, max deviation from the ramp {:.4}",
        config.strategy,
        mask.unknown_count(),
        error
    );

    Ok(())
}
