//! Uploaded photo validation and normalization.

use image::{imageops, imageops::FilterType, RgbImage};

use super::layout::{FitPolicy, PHOTO_FIT};
use super::BadgeError;

/// Uploads past this size are rejected before any decode work.
const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Decode, convert to RGB and fit the upload into the photo slot.
///
/// Alpha channels and color-profile metadata are discarded by the RGB8
/// conversion. Any failure here is recoverable for the caller: the badge is
/// still generated, just without a photo.
pub fn normalize(raw: &[u8], width: u32, height: u32) -> Result<RgbImage, BadgeError> {
    if raw.is_empty() {
        return Err(BadgeError::InvalidPhoto("empty photo payload".into()));
    }
    if raw.len() > MAX_PHOTO_BYTES {
        return Err(BadgeError::InvalidPhoto(format!(
            "photo payload too large: {} bytes",
            raw.len()
        )));
    }

    let decoded = image::load_from_memory(raw)
        .map_err(|e| BadgeError::InvalidPhoto(format!("failed to decode photo: {e}")))?;

    Ok(fit(&decoded.to_rgb8(), PHOTO_FIT, width, height))
}

fn fit(img: &RgbImage, policy: FitPolicy, width: u32, height: u32) -> RgbImage {
    match policy {
        FitPolicy::Stretch => imageops::resize(img, width, height, FilterType::Lanczos3),
        FitPolicy::Cover => {
            let cropped = crop_to_aspect_center(img, width, height);
            imageops::resize(&cropped, width, height, FilterType::Lanczos3)
        }
    }
}

/// Center crop to the target aspect ratio before resizing.
fn crop_to_aspect_center(img: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    let (iw, ih) = (img.width(), img.height());

    let target_aspect = target_w as f32 / target_h as f32;
    let in_aspect = iw as f32 / ih as f32;

    let (crop_w, crop_h) = if in_aspect > target_aspect {
        // too wide
        let ch = ih;
        let cw = (ch as f32 * target_aspect).round().max(1.0) as u32;
        (cw.min(iw), ch)
    } else {
        // too tall
        let cw = iw;
        let ch = (cw as f32 / target_aspect).round().max(1.0) as u32;
        (cw, ch.min(ih))
    };

    let left = (iw - crop_w) / 2;
    let top = (ih - crop_h) / 2;
    imageops::crop_imm(img, left, top, crop_w, crop_h).to_image()
}
