//! Planar CHW image buffers and batches.

use std::fmt;

use crate::error::{Error, Result};

/// Image shape in (channels, height, width) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageShape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl ImageShape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// Number of pixels in one channel plane.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// Total number of samples (channels * height * width).
    pub fn sample_count(&self) -> usize {
        self.channels * self.plane_len()
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.channels, self.height, self.width)
    }
}

/// A planar image: `channels` consecutive row-major planes of `height * width`
/// samples each.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    shape: ImageShape,
    data: Vec<f32>,
}

impl Image {
    pub fn new(shape: ImageShape, data: Vec<f32>) -> Result<Self> {
        if shape.channels == 0 {
            return Err(Error::ZeroChannels);
        }
        if data.len() != shape.sample_count() {
            return Err(Error::DataLength {
                expected: shape.sample_count(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn new_filled(shape: ImageShape, value: f32) -> Result<Self> {
        Self::new(shape, vec![value; shape.sample_count()])
    }

    /// Builds an image by evaluating `f(channel, y, x)` for every sample.
    pub fn from_fn(shape: ImageShape, f: impl Fn(usize, usize, usize) -> f32) -> Result<Self> {
        let mut data = Vec::with_capacity(shape.sample_count());
        for c in 0..shape.channels {
            for y in 0..shape.height {
                for x in 0..shape.width {
                    data.push(f(c, y, x));
                }
            }
        }
        Self::new(shape, data)
    }

    #[inline]
    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.shape.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.shape.width
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// One channel as a flattened row-major plane.
    #[inline]
    pub fn plane(&self, channel: usize) -> &[f32] {
        let len = self.shape.plane_len();
        &self.data[channel * len..(channel + 1) * len]
    }

    #[inline]
    pub fn plane_mut(&mut self, channel: usize) -> &mut [f32] {
        let len = self.shape.plane_len();
        &mut self.data[channel * len..(channel + 1) * len]
    }

    #[inline]
    pub fn get(&self, channel: usize, y: usize, x: usize) -> f32 {
        debug_assert!(channel < self.shape.channels && y < self.shape.height && x < self.shape.width);
        self.data[(channel * self.shape.height + y) * self.shape.width + x]
    }

    #[inline]
    pub fn set(&mut self, channel: usize, y: usize, x: usize, value: f32) {
        debug_assert!(channel < self.shape.channels && y < self.shape.height && x < self.shape.width);
        self.data[(channel * self.shape.height + y) * self.shape.width + x] = value;
    }
}

/// A batch of equally shaped images stored contiguously as (B, C, H, W).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    len: usize,
    shape: ImageShape,
    data: Vec<f32>,
}

impl ImageBatch {
    pub fn new(len: usize, shape: ImageShape, data: Vec<f32>) -> Result<Self> {
        if shape.channels == 0 {
            return Err(Error::ZeroChannels);
        }
        let expected = len * shape.sample_count();
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { len, shape, data })
    }

    /// Stacks images into a batch. All images must share the first image's shape.
    ///
    /// An empty list yields an empty batch with a zero shape of one channel.
    pub fn from_images(images: Vec<Image>) -> Result<Self> {
        let Some(first) = images.first() else {
            return Ok(Self {
                len: 0,
                shape: ImageShape::new(1, 0, 0),
                data: Vec::new(),
            });
        };
        let shape = first.shape();
        let mut data = Vec::with_capacity(images.len() * shape.sample_count());
        for (index, image) in images.iter().enumerate() {
            if image.shape() != shape {
                return Err(Error::BatchImageShape {
                    index,
                    expected: shape,
                    actual: image.shape(),
                });
            }
            data.extend_from_slice(image.data());
        }
        Ok(Self {
            len: images.len(),
            shape,
            data,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Shape of each image in the batch.
    #[inline]
    pub fn image_shape(&self) -> ImageShape {
        self.shape
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Copies item `index` out of the batch.
    pub fn image(&self, index: usize) -> Image {
        assert!(index < self.len, "batch index {index} out of range {}", self.len);
        let size = self.shape.sample_count();
        Image {
            shape: self.shape,
            data: self.data[index * size..(index + 1) * size].to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Image> + '_ {
        (0..self.len).map(|i| self.image(i))
    }

    pub fn into_images(self) -> Vec<Image> {
        let size = self.shape.sample_count();
        if size == 0 {
            return (0..self.len)
                .map(|_| Image {
                    shape: self.shape,
                    data: Vec::new(),
                })
                .collect();
        }
        self.data
            .chunks_exact(size)
            .map(|chunk| Image {
                shape: self.shape,
                data: chunk.to_vec(),
            })
            .collect()
    }
}
