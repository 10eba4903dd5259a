//! Canvas to portable PNG bytes.

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, RgbaImage};

use super::BadgeError;

/// Encoder failure is fatal and must stay distinct from the recoverable
/// photo/font conditions.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, BadgeError> {
    let mut buf = Vec::new();
    let enc = PngEncoder::new(&mut buf);
    enc.write_image(canvas, canvas.width(), canvas.height(), ExtendedColorType::Rgba8)
        .map_err(|e| BadgeError::Encode(e.to_string()))?;
    Ok(buf)
}
