use crate::export;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use serde::Serialize;
use std::path::Path;

/// A named collection of target sizes for web assets.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub sizes: &'static [(u32, u32)],
}

/// Size presets for icons, social cards and thumbnails.
pub static PRESETS: [Preset; 7] = [
    Preset {
        name: "favicon",
        sizes: &[(16, 16), (32, 32), (48, 48)],
    },
    Preset {
        name: "icon-set",
        sizes: &[
            (16, 16),
            (32, 32),
            (48, 48),
            (64, 64),
            (128, 128),
            (256, 256),
            (512, 512),
        ],
    },
    Preset {
        name: "og",
        sizes: &[(1200, 630)],
    },
    Preset {
        name: "twitter",
        sizes: &[(1200, 675)],
    },
    Preset {
        name: "social",
        sizes: &[(1200, 630), (1200, 675)],
    },
    Preset {
        name: "thumb",
        sizes: &[(150, 150)],
    },
    Preset {
        name: "thumb-lg",
        sizes: &[(300, 300)],
    },
];

pub fn preset(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .ok_or_else(|| {
            let names: Vec<&str> = PRESETS.iter().map(|preset| preset.name).collect();
            anyhow::anyhow!("unknown preset {}, expected one of: {}", name, names.join(", "))
        })
}

#[derive(Debug, Serialize)]
pub struct OptimizeReport {
    pub input: String,
    pub output: String,
    pub original: Dimensions,
    pub optimized: SizeReport,
    pub quality: u8,
}

#[derive(Debug, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct SizeReport {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub size_kb: f64,
}

#[derive(Debug, Serialize)]
pub struct PresetReport {
    pub input: String,
    pub preset: &'static str,
    pub original: Dimensions,
    pub outputs: Vec<PresetOutput>,
    pub quality: u8,
}

#[derive(Debug, Serialize)]
pub struct PresetOutput {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub size_kb: f64,
}

#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub path: String,
    pub format: String,
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub size_kb: f64,
}

/// Converts a single image to lossy webp, optionally resizing it first.
/// With both dimensions given the image is fitted into the box keeping its
/// aspect ratio and is never enlarged; with one, the other follows from
/// the source ratio.
pub fn optimize(
    input: &Path,
    output: Option<&Path>,
    width: Option<u32>,
    height: Option<u32>,
    quality: u8,
) -> Result<OptimizeReport> {
    let img = decode(input)?;
    let original = Dimensions {
        width: img.width(),
        height: img.height(),
    };
    let img = resize_to_target(img, width, height);
    let rgba = img.to_rgba8();
    let quality = quality.clamp(1, 100);
    let data = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
        .encode(quality as f32);
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("webp"),
    };
    let size_bytes = export::write_atomic(&output, &data)?;
    Ok(OptimizeReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        original,
        optimized: SizeReport {
            width: rgba.width(),
            height: rgba.height(),
            size_bytes,
            size_kb: kb(size_bytes),
        },
        quality,
    })
}

/// Writes one webp file per preset size into `output_dir` (the input's
/// directory by default), named `{prefix}-{width}x{height}.webp` after the
/// fitted dimensions.
pub fn apply_preset(
    input: &Path,
    preset: &Preset,
    output_dir: Option<&Path>,
    quality: u8,
    prefix: Option<&str>,
) -> Result<PresetReport> {
    let img = decode(input)?;
    let original = Dimensions {
        width: img.width(),
        height: img.height(),
    };
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let base = match prefix {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("image")
            .to_string(),
    };
    let quality = quality.clamp(1, 100);
    let mut outputs = Vec::new();
    for &(width, height) in preset.sizes {
        let rgba = fit_within(&img, width, height).to_rgba8();
        let data = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode(quality as f32);
        let path = dir.join(format!("{}-{}x{}.webp", base, rgba.width(), rgba.height()));
        let size_bytes = export::write_atomic(&path, &data)?;
        outputs.push(PresetOutput {
            path: path.display().to_string(),
            width: rgba.width(),
            height: rgba.height(),
            size_kb: kb(size_bytes),
        });
    }
    Ok(PresetReport {
        input: input.display().to_string(),
        preset: preset.name,
        original,
        outputs,
        quality,
    })
}

/// Reports dimensions, pixel mode, container format and file size without
/// writing anything.
pub fn info(input: &Path) -> Result<InfoReport> {
    let reader = ImageReader::open(input)
        .with_context(|| format!("failed to open {}", input.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to probe {}", input.display()))?;
    let format = match reader.format() {
        Some(format) => format!("{:?}", format),
        None => "unknown".to_string(),
    };
    let img = reader
        .decode()
        .with_context(|| format!("failed to decode {}", input.display()))?;
    let size_bytes = std::fs::metadata(input)?.len();
    Ok(InfoReport {
        path: input.display().to_string(),
        format,
        mode: format!("{:?}", img.color()),
        width: img.width(),
        height: img.height(),
        size_bytes,
        size_kb: kb(size_bytes),
    })
}

fn decode(input: &Path) -> Result<DynamicImage> {
    ImageReader::open(input)
        .with_context(|| format!("failed to open {}", input.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", input.display()))
}

fn resize_to_target(img: DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
    let (orig_width, orig_height) = (img.width(), img.height());
    match (width, height) {
        (Some(width), Some(height)) => fit_within(&img, width, height),
        (Some(width), None) => {
            let height = scaled(orig_height, width, orig_width);
            img.resize_exact(width, height, FilterType::Lanczos3)
        }
        (None, Some(height)) => {
            let width = scaled(orig_width, height, orig_height);
            img.resize_exact(width, height, FilterType::Lanczos3)
        }
        (None, None) => img,
    }
}

/// Thumbnail semantics: fit into the box keeping the aspect ratio, never
/// enlarging a source that already fits.
fn fit_within(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() <= width && img.height() <= height {
        img.clone()
    } else {
        img.resize(width, height, FilterType::Lanczos3)
    }
}

fn scaled(other: u32, target: u32, reference: u32) -> u32 {
    ((other as f64 * target as f64 / reference as f64).round() as u32).max(1)
}

fn kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
