//! Fixed layout for the badge template.
//!
//! All values are deployment constants tied to the template artwork; they are
//! not request-configurable.

use image::Rgba;

/// Top-left anchor of `"Nome: {name}"`.
pub const NAME_POS: (i32, i32) = (50, 175);
/// Top-left anchors of the two data fields.
pub const ID_POS: (i32, i32) = (50, 225);
pub const TAX_ID_POS: (i32, i32) = (50, 275);

/// Point sizes for the name line and the data fields.
pub const NAME_SIZE: u32 = 40;
pub const FIELD_SIZE: u32 = 35;

/// Solid fill for all text.
pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Photo slot: origin of the paste and the exact size every normalized
/// photo is brought to.
pub const PHOTO_POS: (u32, u32) = (220, 340);
pub const PHOTO_SLOT: (u32, u32) = (225, 240);

/// How an uploaded photo is fitted into [`PHOTO_SLOT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitPolicy {
    /// Resize to the exact slot size; aspect ratio is not preserved.
    Stretch,
    /// Center-crop to the slot aspect ratio, then resize.
    Cover,
}

/// Active fit policy. `Stretch` reproduces the historical behavior of this
/// deployment's badge generator.
pub const PHOTO_FIT: FitPolicy = FitPolicy::Stretch;
