//! Font resolution with a guaranteed fallback.
//!
//! Each role has an ordered list of font files probed inside the deployment
//! fonts directory; the first one that reads and parses wins. When none is
//! usable the built-in 8x8 bitmap face takes over, so resolution never fails
//! and a missing font asset only costs visual fidelity.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rusttype::Font;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Logical text role on the badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// The name line, drawn with a bold face.
    Title,
    /// The RG / CPF data fields, drawn with a regular face.
    Body,
}

impl FontRole {
    fn candidates(self) -> &'static [&'static str] {
        match self {
            FontRole::Title => &[
                "DejaVuSans-Bold.ttf",
                "LiberationSans-Bold.ttf",
                "arialbd.ttf",
            ],
            FontRole::Body => &[
                "DejaVuSans.ttf",
                "LiberationSans-Regular.ttf",
                "arial.ttf",
            ],
        }
    }
}

/// A rasterizable face at a fixed point size.
#[derive(Clone)]
pub struct ResolvedFont {
    pub size: u32,
    pub face: FontFace,
}

#[derive(Clone)]
pub enum FontFace {
    Truetype(Arc<Font<'static>>),
    /// Built-in 8x8 bitmap face, drawn at an integer pixel scale.
    Bitmap { scale: u32 },
}

impl ResolvedFont {
    pub fn is_fallback(&self) -> bool {
        matches!(self.face, FontFace::Bitmap { .. })
    }
}

static RESOLVED: Lazy<Mutex<HashMap<(FontRole, u32), ResolvedFont>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn fonts_dir() -> PathBuf {
    std::env::var("FONTS_DIR").map(PathBuf::from).unwrap_or_else(|_| {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join("fonts")
    })
}

/// Resolve a role at a point size. Deterministic; cached for the process
/// lifetime since the (role, size) pairs are finite and repeat per request.
pub fn resolve(role: FontRole, size: u32) -> ResolvedFont {
    if let Some(f) = RESOLVED.lock().get(&(role, size)) {
        return f.clone();
    }

    let resolved = resolve_uncached(&fonts_dir(), role.candidates(), size);
    if resolved.is_fallback() {
        tracing::warn!(
            ?role,
            size,
            "no font asset usable, falling back to built-in bitmap face"
        );
    }

    RESOLVED.lock().insert((role, size), resolved.clone());
    resolved
}

fn resolve_uncached(dir: &Path, candidates: &[&str], size: u32) -> ResolvedFont {
    for name in candidates {
        let Ok(bytes) = std::fs::read(dir.join(name)) else {
            continue;
        };
        match Font::try_from_vec(bytes) {
            Some(font) => {
                return ResolvedFont {
                    size,
                    face: FontFace::Truetype(Arc::new(font)),
                }
            }
            None => {
                tracing::debug!(name, "font file present but not parseable, skipping");
            }
        }
    }

    let scale = ((size as f32 / 8.0).round() as u32).max(1);
    ResolvedFont {
        size,
        face: FontFace::Bitmap { scale },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dir_resolves_to_bitmap_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let f = resolve_uncached(dir.path(), FontRole::Title.candidates(), 40);
        assert!(f.is_fallback());
        match f.face {
            FontFace::Bitmap { scale } => assert_eq!(scale, 5),
            _ => unreachable!(),
        }
    }

    #[test]
    fn garbage_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DejaVuSans.ttf"), b"not a font").unwrap();
        let f = resolve_uncached(dir.path(), FontRole::Body.candidates(), 35);
        assert!(f.is_fallback());
    }

    #[test]
    fn tiny_sizes_keep_a_positive_scale() {
        let dir = tempfile::tempdir().unwrap();
        let f = resolve_uncached(dir.path(), FontRole::Body.candidates(), 3);
        match f.face {
            FontFace::Bitmap { scale } => assert_eq!(scale, 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn resolve_is_stable_across_calls() {
        let a = resolve(FontRole::Body, 35);
        let b = resolve(FontRole::Body, 35);
        assert_eq!(a.size, b.size);
        assert_eq!(a.is_fallback(), b.is_fallback());
    }
}
