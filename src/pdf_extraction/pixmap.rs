// Raw pixel buffers decoded from PDF image streams
use crate::types::{ExtractError, Result};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// Interleaved 8-bit samples, `color_channels` per pixel plus one alpha
/// sample when `alpha` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub color_channels: u8,
    pub alpha: bool,
    pub samples: Vec<u8>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, color_channels: u8, alpha: bool, samples: Vec<u8>) -> Result<Self> {
        let mut pixmap = Self { width, height, color_channels, alpha, samples };
        let expected = pixmap
            .pixel_count()
            .and_then(|n| n.checked_mul(pixmap.channels()))
            .ok_or_else(|| ExtractError::UnsupportedImage(format!("{}x{} image is too large", width, height)))?;
        if pixmap.samples.len() < expected {
            return Err(ExtractError::UnsupportedImage(format!(
                "{}x{} image with {} channels needs {} bytes, stream has {}",
                width,
                height,
                pixmap.channels(),
                expected,
                pixmap.samples.len()
            )));
        }
        pixmap.samples.truncate(expected);
        Ok(pixmap)
    }

    pub fn channels(&self) -> usize {
        self.color_channels as usize + usize::from(self.alpha)
    }

    fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Four or more color channels (CMYK) can't be written as PNG directly.
    pub fn needs_rgb_conversion(&self) -> bool {
        self.color_channels >= 4
    }

    /// CMYK to RGB, keeping any alpha channel.
    pub fn to_rgb(&self) -> Result<Pixmap> {
        if self.color_channels != 4 {
            return Err(ExtractError::UnsupportedImage(format!(
                "cannot convert {} color channels to RGB",
                self.color_channels
            )));
        }
        let stride = self.channels();
        let mut samples = Vec::with_capacity(self.samples.len() / stride * (3 + usize::from(self.alpha)));
        for px in self.samples.chunks_exact(stride) {
            let k = 255 - px[3] as u16;
            for &ink in &px[..3] {
                samples.push(((255 - ink as u16) * k / 255) as u8);
            }
            if self.alpha {
                samples.push(px[4]);
            }
        }
        Pixmap::new(self.width, self.height, 3, self.alpha, samples)
    }

    /// Attach a soft mask as the alpha channel.
    pub fn with_alpha(self, mask: &Pixmap) -> Result<Pixmap> {
        if self.alpha || mask.color_channels != 1 || mask.alpha || mask.width != self.width || mask.height != self.height {
            return Err(ExtractError::UnsupportedImage("soft mask does not match image".into()));
        }
        let stride = self.channels();
        let mut samples = Vec::with_capacity(self.samples.len() / stride * (stride + 1));
        for (px, &a) in self.samples.chunks_exact(stride).zip(&mask.samples) {
            samples.extend_from_slice(px);
            samples.push(a);
        }
        Pixmap::new(self.width, self.height, self.color_channels, true, samples)
    }

    pub fn from_dynamic(image: DynamicImage) -> Pixmap {
        let (width, height) = (image.width(), image.height());
        let (color_channels, alpha, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, false, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (1, true, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, false, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (3, true, buf.into_raw()),
            other => (3, false, other.to_rgb8().into_raw()),
        };
        Pixmap { width, height, color_channels, alpha, samples }
    }

    pub fn into_image(self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let mismatch = || ExtractError::UnsupportedImage(format!("{}x{} buffer size mismatch", w, h));
        let image = match (self.color_channels, self.alpha) {
            (1, false) => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, self.samples).ok_or_else(mismatch)?),
            (1, true) => DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(w, h, self.samples).ok_or_else(mismatch)?),
            (3, false) => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, self.samples).ok_or_else(mismatch)?),
            (3, true) => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, self.samples).ok_or_else(mismatch)?),
            (n, _) => {
                return Err(ExtractError::UnsupportedImage(format!(
                    "{} color channels cannot be saved directly",
                    n
                )))
            }
        };
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sample_buffer_is_rejected() {
        assert!(Pixmap::new(2, 2, 3, false, vec![0; 11]).is_err());
        assert_eq!(Pixmap::new(2, 2, 3, false, vec![0; 14]).unwrap().samples.len(), 12);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = Pixmap::new(4_000_000_000, 4_000_000_000, 3, false, vec![0; 3]).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedImage(_)));
        assert!(Pixmap::new(u32::MAX, u32::MAX, 4, true, Vec::new()).is_err());
    }

    #[test]
    fn cmyk_needs_conversion_but_rgb_alpha_does_not() {
        assert!(Pixmap::new(1, 1, 4, false, vec![0; 4]).unwrap().needs_rgb_conversion());
        assert!(!Pixmap::new(1, 1, 3, true, vec![0; 4]).unwrap().needs_rgb_conversion());
        assert!(!Pixmap::new(1, 1, 1, true, vec![0; 2]).unwrap().needs_rgb_conversion());
    }

    #[test]
    fn cmyk_converts_to_rgb() {
        // white, black (K), cyan
        let cmyk = Pixmap::new(3, 1, 4, false, vec![0, 0, 0, 0, 0, 0, 0, 255, 255, 0, 0, 0]).unwrap();
        let rgb = cmyk.to_rgb().unwrap();
        assert_eq!(rgb.color_channels, 3);
        assert_eq!(rgb.samples, vec![255, 255, 255, 0, 0, 0, 0, 255, 255]);
    }

    #[test]
    fn cmyk_conversion_keeps_alpha() {
        let cmyka = Pixmap::new(1, 1, 4, true, vec![0, 0, 0, 0, 128]).unwrap();
        let rgba = cmyka.to_rgb().unwrap();
        assert!(rgba.alpha);
        assert_eq!(rgba.samples, vec![255, 255, 255, 128]);
    }

    #[test]
    fn soft_mask_becomes_alpha() {
        let rgb = Pixmap::new(2, 1, 3, false, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mask = Pixmap::new(2, 1, 1, false, vec![9, 8]).unwrap();
        let rgba = rgb.with_alpha(&mask).unwrap();
        assert_eq!(rgba.samples, vec![1, 2, 3, 9, 4, 5, 6, 8]);

        let wrong = Pixmap::new(1, 1, 1, false, vec![0]).unwrap();
        let rgb = Pixmap::new(2, 1, 3, false, vec![0; 6]).unwrap();
        assert!(rgb.with_alpha(&wrong).is_err());
    }

    #[test]
    fn image_conversion_round_trips_layout() {
        let gray = Pixmap::new(2, 2, 1, false, vec![0, 64, 128, 255]).unwrap();
        let image = gray.clone().into_image().unwrap();
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
        assert_eq!(Pixmap::from_dynamic(image), gray);

        let cmyk = Pixmap::new(1, 1, 4, false, vec![0; 4]).unwrap();
        assert!(cmyk.into_image().is_err());
    }
}
