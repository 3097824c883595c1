use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::error::DecodeError;

// ITU-R BT.709 luma weights
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

// Normalized elevation grid derived from image luminance.
// Row-major, top row first: sample (x, y) lives at `y * width + x`.
// Every sample is in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl Heightfield {
    // Build from raw samples; values are clamped into [0, 1] and NaN becomes 0
    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(DecodeError::SampleCount {
                expected,
                actual: samples.len(),
            });
        }

        let samples = samples
            .into_iter()
            .map(|s| if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0) })
            .collect();

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    // Elevation at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.width && y < self.height);
        self.samples[y as usize * self.width as usize + x as usize]
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)))
    }
}

// Decode opaque image bytes; the format is sniffed from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let image = image::load_from_memory(bytes)?;
    debug!(
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "decoded image"
    );
    Ok(image)
}

// Convert an image to a heightfield at its native resolution
pub fn extract(image: &DynamicImage) -> Result<Heightfield, DecodeError> {
    extract_rgba(&image.to_rgba8())
}

pub fn extract_rgba(rgba: &RgbaImage) -> Result<Heightfield, DecodeError> {
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }

    // `pixels()` walks rows top to bottom, left to right
    let samples = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, _alpha] = p.0;
            luminance(r, g, b)
        })
        .collect();

    Ok(Heightfield {
        width,
        height,
        samples,
    })
}

// Relative luminance in [0, 1]. Alpha is ignored.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let l = (LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32) / 255.0;
    // the weights sum to 1 only up to rounding
    l.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn luminance_extremes() {
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert!((luminance(255, 255, 255) - 1.0).abs() < 1e-6);
        // green dominates red dominates blue
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
    }

    #[test]
    fn extract_keeps_dimensions_and_row_order() {
        // 3 wide, 2 tall: white top-left corner, everything else black
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 1, Rgba([128, 128, 128, 255]));

        let hf = extract_rgba(&img).unwrap();
        assert_eq!((hf.width(), hf.height()), (3, 2));
        assert_eq!(hf.samples().len(), 6);
        assert!((hf.get(0, 0) - 1.0).abs() < 1e-6);
        assert_eq!(hf.get(1, 0), 0.0);
        assert!((hf.get(2, 1) - 128.0 / 255.0).abs() < 1e-5);
        assert_eq!(hf.samples()[5], hf.get(2, 1));
    }

    #[test]
    fn extract_ignores_alpha() {
        let opaque = RgbaImage::from_pixel(1, 1, Rgba([10, 200, 30, 255]));
        let clear = RgbaImage::from_pixel(1, 1, Rgba([10, 200, 30, 0]));
        assert_eq!(
            extract_rgba(&opaque).unwrap().samples(),
            extract_rgba(&clear).unwrap().samples()
        );
    }

    #[test]
    fn zero_area_is_rejected() {
        let img = RgbaImage::new(0, 4);
        assert!(matches!(
            extract_rgba(&img),
            Err(DecodeError::Empty {
                width: 0,
                height: 4
            })
        ));
    }

    #[test]
    fn from_samples_clamps_and_validates() {
        let hf = Heightfield::from_samples(2, 1, vec![-0.5, f32::NAN]).unwrap();
        assert_eq!(hf.samples(), &[0.0, 0.0]);

        let hf = Heightfield::from_samples(1, 1, vec![3.0]).unwrap();
        assert_eq!(hf.samples(), &[1.0]);

        assert!(matches!(
            Heightfield::from_samples(2, 2, vec![0.0; 3]),
            Err(DecodeError::SampleCount {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn min_max_spans_samples() {
        let hf = Heightfield::from_samples(3, 1, vec![0.25, 0.75, 0.5]).unwrap();
        assert_eq!(hf.min_max(), (0.25, 0.75));
    }
}
