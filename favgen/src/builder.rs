use crate::catalogue::{SizeSpec, ICO_NAME, ICO_SIZES, WEBMANIFEST_NAME, WEB_SIZES};
use crate::export;
use crate::scaler::Scaler;
use crate::webmanifest::WebManifest;
use anyhow::{Context, Result};
use ico::{IcoEntry, IcoFile};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata for one artifact written to the output directory.
#[derive(Clone, Debug)]
pub struct Artifact {
    pub name: String,
    /// Pixel dimensions, `None` for multi-size or non-raster artifacts.
    pub dimensions: Option<(u32, u32)>,
    pub size: u64,
}

/// Drives the catalogue: resample, encode and write every artifact in a
/// fixed order. The first failure aborts the run; artifacts recorded up to
/// that point stay readable and already written files are not rolled back.
pub struct Favicon {
    scaler: Scaler,
    dir: PathBuf,
    artifacts: Vec<Artifact>,
}

impl Favicon {
    pub fn new(source: &Path, dir: &Path) -> Result<Self> {
        Self::from_scaler(Scaler::open(source)?, dir)
    }

    pub fn from_scaler(scaler: Scaler, dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        Ok(Self {
            scaler,
            dir: dir.to_path_buf(),
            artifacts: vec![],
        })
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        self.scaler.dimensions()
    }

    pub fn add_png(&mut self, spec: &SizeSpec) -> Result<()> {
        let frame = self.scaler.render(spec.width, spec.height);
        let png = export::encode_png(&frame, export::DEFAULT_LEVEL)?;
        let size = export::write_atomic(&self.dir.join(spec.file_name), &png)?;
        debug!(
            "wrote {} ({}x{}, {} bytes)",
            spec.file_name, spec.width, spec.height, size
        );
        self.artifacts.push(Artifact {
            name: spec.file_name.to_string(),
            dimensions: Some((spec.width, spec.height)),
            size,
        });
        Ok(())
    }

    pub fn add_pngs(&mut self) -> Result<()> {
        for spec in &WEB_SIZES {
            self.add_png(spec)?;
        }
        Ok(())
    }

    pub fn add_ico(&mut self) -> Result<()> {
        let mut file = IcoFile::default();
        for &px in &ICO_SIZES {
            let frame = self.scaler.render(px, px);
            let png = export::encode_png(&frame, export::ICO_LEVEL)?;
            file.entries.push(IcoEntry::new(px, px, png));
        }
        let mut buf = Vec::new();
        file.write(&mut buf)?;
        let size = export::write_atomic(&self.dir.join(ICO_NAME), &buf)?;
        debug!("wrote {} ({} bytes)", ICO_NAME, size);
        self.artifacts.push(Artifact {
            name: ICO_NAME.to_string(),
            dimensions: None,
            size,
        });
        Ok(())
    }

    pub fn add_webmanifest(&mut self, name: &str, theme_color: &str) -> Result<()> {
        let manifest = WebManifest::new(name, theme_color);
        let size = export::write_atomic(&self.dir.join(WEBMANIFEST_NAME), &manifest.to_json()?)?;
        debug!("wrote {} ({} bytes)", WEBMANIFEST_NAME, size);
        self.artifacts.push(Artifact {
            name: WEBMANIFEST_NAME.to_string(),
            dimensions: None,
            size,
        });
        Ok(())
    }

    /// Artifacts written so far, in generation order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn finish(self) -> Vec<Artifact> {
        self.artifacts
    }
}
