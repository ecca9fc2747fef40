use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Default compression level for the web png set.
pub const DEFAULT_LEVEL: u8 = 80;

/// Fixed compression level for the small frames embedded in favicon.ico.
pub const ICO_LEVEL: u8 = 90;

/// Encodes a frame as png. `level` ranges 0 to 100, higher compresses
/// harder. The mapping is deterministic so repeated runs produce identical
/// bytes.
pub fn encode_png(frame: &RgbaImage, level: u8) -> Result<Vec<u8>> {
    let (compression, filter) = match level.min(100) {
        0..=39 => (CompressionType::Fast, FilterType::NoFilter),
        40..=79 => (CompressionType::Default, FilterType::Adaptive),
        _ => (CompressionType::Best, FilterType::Adaptive),
    };
    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, compression, filter).write_image(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buf)
}

/// Writes `data` to `path` through a temp file in the same directory that
/// is renamed into place, so readers never observe a partial artifact.
/// Returns the number of bytes written.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<u64> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
    tmp.write_all(data)?;
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(data.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn png_roundtrip_keeps_dimensions() -> Result<()> {
        let frame = RgbaImage::from_pixel(33, 17, Rgba([0, 128, 255, 200]));
        let png = encode_png(&frame, DEFAULT_LEVEL)?;
        let decoded = image::load_from_memory(&png)?;
        assert_eq!((decoded.width(), decoded.height()), (33, 17));
        Ok(())
    }

    #[test]
    fn encoding_is_deterministic() -> Result<()> {
        let frame = RgbaImage::from_pixel(20, 20, Rgba([1, 2, 3, 4]));
        assert_eq!(encode_png(&frame, 80)?, encode_png(&frame, 80)?);
        Ok(())
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.png");
        let written = write_atomic(&path, b"payload")?;
        assert_eq!(written, 7);
        assert_eq!(std::fs::read(&path)?, b"payload");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("missing").join("out.png");
        let err = write_atomic(&path, b"payload").unwrap_err();
        assert!(err.to_string().contains("temp file"));
        assert!(!path.exists());
        Ok(())
    }
}
