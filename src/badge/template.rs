//! The fixed badge template artwork.
//!
//! Loaded exactly once at process start and never written afterwards; every
//! request draws on its own clone, so concurrent generations cannot interfere.

use image::RgbaImage;
use std::path::{Path, PathBuf};

use super::BadgeError;

#[derive(Debug)]
pub struct Template {
    image: RgbaImage,
}

impl Template {
    /// Deployment template location, `TEMPLATE_PATH` override first.
    pub fn default_path() -> PathBuf {
        std::env::var("TEMPLATE_PATH").map(PathBuf::from).unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("assets")
                .join("template_cracha.jpg")
        })
    }

    /// Read and decode the template. A missing or undecodable asset is fatal:
    /// no badge can be produced without it.
    pub fn load(path: &Path) -> Result<Self, BadgeError> {
        let bytes = std::fs::read(path).map_err(|e| {
            BadgeError::TemplateMissing(format!("{}: {e}", path.display()))
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| BadgeError::TemplateMissing(format!("{}: {e}", path.display())))?
            .to_rgba8();
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fresh mutable drawing surface for a single request.
    pub fn canvas(&self) -> RgbaImage {
        self.image.clone()
    }
}
