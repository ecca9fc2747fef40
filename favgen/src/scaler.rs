use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{ImageReader, RgbaImage};
use std::path::Path;

/// The source raster, decoded once and shared by every output size.
#[derive(Debug)]
pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    /// Opens and decodes the source image, promoting it to rgba8 so all
    /// outputs share one pixel format.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let channels = img.color().channel_count();
        if channels > 4 {
            anyhow::bail!("unsupported pixel layout with {} channels", channels);
        }
        Ok(Self {
            img: img.to_rgba8(),
        })
    }

    pub fn from_image(img: RgbaImage) -> Self {
        Self { img }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Scales the source to exactly `width` x `height`. Non-square sources
    /// are stretched to the target box, matching what favicon consumers
    /// expect from callers that supply square sources.
    pub fn render(&self, width: u32, height: u32) -> RgbaImage {
        image::imageops::resize(&self.img, width, height, FilterType::Lanczos3)
    }
}
