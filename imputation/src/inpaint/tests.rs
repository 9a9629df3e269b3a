//! Tests for inpainting-based imputation.

use super::*;
use crate::error::Error;
use crate::image::ImageShape;
use crate::batch::BatchOptions;
use crate::image::ImageBatch;
use crate::mask::MaskBatch;
use crate::testing::{assert_known_unchanged, init_tracing, mask_with_hole, random_image, random_mask};

fn telea() -> InpaintImputer<TeleaFiller> {
    InpaintImputer::default()
}

#[test]
fn test_constant_image_fills_constant() {
    let image = Image::new_filled(ImageShape::new(3, 10, 10), 0.25).unwrap();
    let mask = mask_with_hole(10, 10, 3, 3, 7, 7);

    let out = telea().impute(&image, &mask).unwrap();

    for &v in out.data() {
        assert!((v - 0.25).abs() < 1e-3, "expected 0.25, got {}", v);
    }
}

#[test]
fn test_known_pixels_unchanged() {
    init_tracing();
    let image = random_image(ImageShape::new(3, 24, 20), 21);
    let mask = random_mask(20, 24, 0.3, 22);

    let out = telea().impute(&image, &mask).unwrap();

    assert_known_unchanged(&image, &out, &mask);
}

#[test]
fn test_fills_every_region_pixel() {
    // Sentinel values inside the hole must all be replaced.
    let mut image = Image::new_filled(ImageShape::new(1, 12, 12), 0.5).unwrap();
    let mask = mask_with_hole(12, 12, 2, 2, 10, 10);
    for i in mask.unknown_indices() {
        image.data_mut()[i] = 100.0;
    }

    let out = telea().impute(&image, &mask).unwrap();

    for i in mask.unknown_indices() {
        let v = out.data()[i];
        assert!((v - 0.5).abs() < 1e-3, "pixel {} not filled: {}", i, v);
    }
}

#[test]
fn test_linear_gradient_is_continued() {
    // Horizontal ramp; a vertical strip hole should be bridged with values
    // between the strip's neighbours.
    let image = Image::from_fn(ImageShape::new(1, 16, 16), |_, _, x| x as f32 / 15.0).unwrap();
    let mask = mask_with_hole(16, 16, 6, 0, 9, 16);

    let out = telea().impute(&image, &mask).unwrap();

    let left = image.get(0, 8, 5);
    let right = image.get(0, 8, 9);
    for x in 6..9 {
        let v = out.get(0, 8, x);
        assert!(
            v >= left - 0.1 && v <= right + 0.1,
            "x={} value {} outside [{}, {}]",
            x,
            v,
            left,
            right
        );
    }
}

#[test]
fn test_fully_masked_image_left_as_is() {
    let image = random_image(ImageShape::new(1, 4, 4), 3);
    let mask = Mask::all_unknown(4, 4);

    let out = telea().impute(&image, &mask).unwrap();

    assert_eq!(out, image);
}

#[test]
fn test_all_known_is_identity() {
    let image = random_image(ImageShape::new(3, 6, 6), 4);
    let mask = Mask::all_known(6, 6);

    let out = telea().impute(&image, &mask).unwrap();

    assert_eq!(out, image);
}

#[test]
fn test_non_finite_input_rejected() {
    let mut image = Image::new_filled(ImageShape::new(1, 4, 4), 0.0).unwrap();
    image.set(0, 0, 0, f32::NAN);
    let mask = mask_with_hole(4, 4, 1, 1, 2, 2);

    let err = telea().impute(&image, &mask).unwrap_err();

    assert!(matches!(err, Error::Inpaint(_)));
}

#[test]
fn test_zero_radius_rejected() {
    let image = Image::new_filled(ImageShape::new(1, 4, 4), 0.0).unwrap();
    let mask = mask_with_hole(4, 4, 1, 1, 2, 2);

    let err = InpaintImputer::new(TeleaFiller::new(0))
        .impute(&image, &mask)
        .unwrap_err();

    assert!(matches!(err, Error::Inpaint(_)));
}

#[test]
fn test_radius_above_limit_rejected() {
    let image = Image::new_filled(ImageShape::new(1, 4, 4), 0.0).unwrap();
    let mask = mask_with_hole(4, 4, 1, 1, 2, 2);

    let err = InpaintImputer::new(TeleaFiller::new(MAX_INPAINT_RADIUS + 1))
        .impute(&image, &mask)
        .unwrap_err();

    assert!(matches!(err, Error::Inpaint(_)));
}

#[test]
fn test_four_channels_use_two_passes() {
    let image = Image::from_fn(ImageShape::new(4, 8, 8), |c, _, _| c as f32 * 0.25).unwrap();
    let mask = mask_with_hole(8, 8, 2, 2, 6, 6);

    let out = telea().impute(&image, &mask).unwrap();

    for c in 0..4 {
        let expected = c as f32 * 0.25;
        for &v in out.plane(c) {
            assert!((v - expected).abs() < 1e-3, "channel {} got {}", c, v);
        }
    }
}

#[test]
fn test_sequential_batch_matches_parallel_and_single() {
    let shape = ImageShape::new(3, 10, 9);
    let images: Vec<Image> = (0..4).map(|i| random_image(shape, 30 + i)).collect();
    let masks: Vec<Mask> = (0..4).map(|i| random_mask(9, 10, 0.3, 40 + i)).collect();
    let batch = ImageBatch::from_images(images.clone()).unwrap();
    let mask_batch = MaskBatch::from_masks(masks.clone()).unwrap();

    let sequential = telea()
        .with_batch_options(BatchOptions::sequential())
        .impute_batch(&batch, &mask_batch)
        .unwrap();
    let parallel = telea().impute_batch(&batch, &mask_batch).unwrap();

    assert_eq!(sequential, parallel);
    for (i, (image, mask)) in images.iter().zip(&masks).enumerate() {
        assert_eq!(sequential.image(i), telea().impute(image, mask).unwrap());
    }
}

#[test]
fn test_mask_shape_mismatch() {
    let image = Image::new_filled(ImageShape::new(1, 4, 4), 0.0).unwrap();
    let mask = Mask::all_known(5, 4);

    let err = telea().impute(&image, &mask).unwrap_err();

    assert!(matches!(err, Error::MaskShape { .. }));
}

#[test]
fn test_custom_filler_receives_complemented_mask() {
    struct RegionCounter;

    impl RegionFiller for RegionCounter {
        fn fill(&self, image: &Image, region: &Mask) -> crate::Result<Image> {
            let mut out = image.clone();
            for (i, &fill) in region.as_slice().iter().enumerate() {
                if fill {
                    out.data_mut()[i] = -1.0;
                }
            }
            Ok(out)
        }
    }

    let image = Image::new_filled(ImageShape::new(1, 2, 2), 1.0).unwrap();
    let mask = Mask::new(2, 2, vec![true, false, true, true]).unwrap();

    let out = InpaintImputer::new(RegionCounter).impute(&image, &mask).unwrap();

    assert_eq!(out.data(), &[1.0, -1.0, 1.0, 1.0]);
}
