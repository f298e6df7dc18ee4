//! Multi-channel images and conversion at the host boundary.
//!
//! Hosts hand over interleaved pixel buffers in one of several sample
//! formats. Everything is normalized to planar `f32` on the way in and
//! converted back (clamped to [0, 1]) on the way out, so the engines only ever
//! see [`Plane`]s.

use strum_macros::Display;

use crate::error::{Error, Result};
use crate::plane::Plane;

/// Image dimensions: width, height, and number of channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageDimensions {
    pub width: usize,
    pub height: usize,
    /// 1 for grayscale, 3 or more for color.
    pub channels: usize,
}

impl ImageDimensions {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Total number of samples (width * height * channels).
    pub fn sample_count(&self) -> usize {
        self.width * self.height * self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    pub fn is_color(&self) -> bool {
        self.channels >= 3
    }
}

/// Sample representation of a host pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SampleFormat {
    U8,
    U16,
    U32,
    F32,
    F64,
    Complex32,
    Complex64,
}

impl SampleFormat {
    pub fn is_complex(self) -> bool {
        matches!(self, SampleFormat::Complex32 | SampleFormat::Complex64)
    }
}

/// Interleaved sample storage as received from the host.
///
/// Complex variants hold `[re, im]` pairs and are only representable so they
/// can be rejected with a proper error.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Complex32(Vec<[f32; 2]>),
    Complex64(Vec<[f64; 2]>),
}

impl PixelData {
    pub fn format(&self) -> SampleFormat {
        match self {
            PixelData::U8(_) => SampleFormat::U8,
            PixelData::U16(_) => SampleFormat::U16,
            PixelData::U32(_) => SampleFormat::U32,
            PixelData::F32(_) => SampleFormat::F32,
            PixelData::F64(_) => SampleFormat::F64,
            PixelData::Complex32(_) => SampleFormat::Complex32,
            PixelData::Complex64(_) => SampleFormat::Complex64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::U32(v) => v.len(),
            PixelData::F32(v) => v.len(),
            PixelData::F64(v) => v.len(),
            PixelData::Complex32(v) => v.len(),
            PixelData::Complex64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalized sample at `idx`. Integer samples are divided by the type maximum.
    fn normalized(&self, idx: usize) -> f32 {
        match self {
            PixelData::U8(v) => v[idx] as f32 / u8::MAX as f32,
            PixelData::U16(v) => v[idx] as f32 / u16::MAX as f32,
            PixelData::U32(v) => (v[idx] as f64 / u32::MAX as f64) as f32,
            PixelData::F32(v) => v[idx],
            PixelData::F64(v) => v[idx] as f32,
            PixelData::Complex32(_) | PixelData::Complex64(_) => {
                unreachable!("complex samples are rejected before conversion")
            }
        }
    }
}

/// Interleaved host pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: PixelData,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, channels: usize, data: PixelData) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height, self.channels)
    }
}

/// A planar image of one (grayscale) or at least three (color) channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    dimensions: ImageDimensions,
    planes: Vec<Plane>,
}

impl Image {
    /// Build an image from per-channel planes.
    pub fn from_planes(planes: Vec<Plane>) -> Result<Self> {
        let Some(first) = planes.first() else {
            return Err(Error::UnsupportedChannelCount(0));
        };
        let dimensions = ImageDimensions::new(first.width(), first.height(), planes.len());
        validate_shape(dimensions)?;

        for plane in &planes[1..] {
            if !plane.same_dimensions(first) {
                return Err(Error::DimensionMismatch {
                    dimensions,
                    expected: first.len(),
                    actual: plane.len(),
                });
            }
        }

        Ok(Self { dimensions, planes })
    }

    /// Single-channel image from row-major samples.
    pub fn from_gray(width: usize, height: usize, pixels: Vec<f32>) -> Result<Self> {
        let dimensions = ImageDimensions::new(width, height, 1);
        if pixels.len() != dimensions.sample_count() {
            return Err(Error::DimensionMismatch {
                dimensions,
                expected: dimensions.sample_count(),
                actual: pixels.len(),
            });
        }
        Self::from_planes(vec![Plane::new(width, height, pixels)])
    }

    /// Convert a host buffer into normalized planes.
    ///
    /// Complex buffers are rejected before anything else is inspected.
    pub fn from_buffer(buffer: &PixelBuffer) -> Result<Self> {
        let format = buffer.data.format();
        if format.is_complex() {
            return Err(Error::UnsupportedSampleType { format });
        }

        let dimensions = buffer.dimensions();
        validate_shape(dimensions)?;
        if buffer.data.len() != dimensions.sample_count() {
            return Err(Error::DimensionMismatch {
                dimensions,
                expected: dimensions.sample_count(),
                actual: buffer.data.len(),
            });
        }

        let channels = dimensions.channels;
        let planes = (0..channels)
            .map(|c| {
                let pixels = (0..dimensions.pixel_count())
                    .map(|i| buffer.data.normalized(i * channels + c))
                    .collect();
                Plane::new(dimensions.width, dimensions.height, pixels)
            })
            .collect();

        Ok(Self { dimensions, planes })
    }

    /// Convert back to an interleaved buffer in `format`, clamping to [0, 1].
    ///
    /// Returns `UnsupportedSampleType` for complex formats.
    pub fn to_buffer(&self, format: SampleFormat) -> Result<PixelBuffer> {
        let channels = self.dimensions.channels;
        let n = self.dimensions.sample_count();
        let sample = |i: usize| self.planes[i % channels][i / channels].clamp(0.0, 1.0);

        let data = match format {
            SampleFormat::U8 => PixelData::U8(
                (0..n)
                    .map(|i| (sample(i) * u8::MAX as f32).round() as u8)
                    .collect(),
            ),
            SampleFormat::U16 => PixelData::U16(
                (0..n)
                    .map(|i| (sample(i) * u16::MAX as f32).round() as u16)
                    .collect(),
            ),
            SampleFormat::U32 => PixelData::U32(
                (0..n)
                    .map(|i| (sample(i) as f64 * u32::MAX as f64).round() as u32)
                    .collect(),
            ),
            SampleFormat::F32 => PixelData::F32((0..n).map(sample).collect()),
            SampleFormat::F64 => PixelData::F64((0..n).map(|i| sample(i) as f64).collect()),
            SampleFormat::Complex32 | SampleFormat::Complex64 => {
                return Err(Error::UnsupportedSampleType { format });
            }
        };

        Ok(PixelBuffer::new(
            self.dimensions.width,
            self.dimensions.height,
            channels,
            data,
        ))
    }

    #[inline]
    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.dimensions.channels
    }

    #[inline]
    pub fn is_color(&self) -> bool {
        self.dimensions.is_color()
    }

    pub fn plane(&self, channel: usize) -> &Plane {
        &self.planes[channel]
    }

    pub fn plane_mut(&mut self, channel: usize) -> &mut Plane {
        &mut self.planes[channel]
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    pub fn into_planes(self) -> Vec<Plane> {
        self.planes
    }
}

fn validate_shape(dimensions: ImageDimensions) -> Result<()> {
    if dimensions.channels != 1 && dimensions.channels < 3 {
        return Err(Error::UnsupportedChannelCount(dimensions.channels));
    }
    if dimensions.pixel_count() == 0 {
        return Err(Error::EmptyImage);
    }
    Ok(())
}
