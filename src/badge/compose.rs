//! Drawing the badge: text fields and the optional photo onto a fresh
//! canvas cloned from the template.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage, RgbImage};
use rusttype::{point, Font, Scale};

use super::font::{self, FontFace, FontRole, ResolvedFont};
use super::layout;
use super::template::Template;
use super::BadgeRequest;

/// Compose one badge. Text drawing cannot fail: the resolver always hands
/// back a usable face, and out-of-canvas pixels are clipped.
pub fn compose(template: &Template, request: &BadgeRequest, photo: Option<&RgbImage>) -> RgbaImage {
    let mut canvas = template.canvas();

    let title = font::resolve(FontRole::Title, layout::NAME_SIZE);
    let body = font::resolve(FontRole::Body, layout::FIELD_SIZE);

    draw_text(
        &mut canvas,
        &title,
        layout::NAME_POS,
        layout::TEXT_COLOR,
        &format!("Nome: {}", request.name),
    );
    draw_text(
        &mut canvas,
        &body,
        layout::ID_POS,
        layout::TEXT_COLOR,
        &format!("RG: {}", request.id_number),
    );
    draw_text(
        &mut canvas,
        &body,
        layout::TAX_ID_POS,
        layout::TEXT_COLOR,
        &format!("CPF: {}", request.tax_id),
    );

    if let Some(photo) = photo {
        let (x, y) = layout::PHOTO_POS;
        paste_photo(&mut canvas, photo, x, y);
    }

    canvas
}

fn draw_text(img: &mut RgbaImage, font: &ResolvedFont, pos: (i32, i32), color: Rgba<u8>, text: &str) {
    match &font.face {
        FontFace::Truetype(face) => draw_truetype(img, face, font.size as f32, pos, color, text),
        FontFace::Bitmap { scale } => draw_bitmap(img, *scale, pos, color, text),
    }
}

fn draw_truetype(
    img: &mut RgbaImage,
    face: &Font<'static>,
    px: f32,
    (x, y): (i32, i32),
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = face.v_metrics(scale);
    let mut caret_x = x as f32;
    // layout y is the glyph-box top; rusttype positions by baseline
    let baseline_y = y as f32 + v_metrics.ascent;

    for ch in text.chars() {
        let glyph = face.glyph(ch).scaled(scale).positioned(point(caret_x, baseline_y));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() {
                    return;
                }
                let a = (v * 255.0) as u8;
                if a == 0 {
                    return;
                }
                let dst = img.get_pixel_mut(px, py);
                // alpha blend: src over dst
                let sa = a as f32 / 255.0;
                let inv = 1.0 - sa;
                dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
                dst.0[3] = 255;
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width;
    }
}

fn draw_bitmap(img: &mut RgbaImage, scale: u32, (x, y): (i32, i32), color: Rgba<u8>, text: &str) {
    let glyph_gap = scale as i32;
    let mut cursor_x = x;

    for ch in text.chars() {
        let glyph = bitmap_glyph(ch);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                // each set bit becomes a scale x scale block
                let base_x = cursor_x + (col * scale) as i32;
                let base_y = y + (row as u32 * scale) as i32;
                for dx in 0..scale as i32 {
                    for dy in 0..scale as i32 {
                        let (px, py) = (base_x + dx, base_y + dy);
                        if px < 0 || py < 0 {
                            continue;
                        }
                        let (px, py) = (px as u32, py as u32);
                        if px >= img.width() || py >= img.height() {
                            continue;
                        }
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
        cursor_x += (8 * scale) as i32 + glyph_gap;
    }
}

fn bitmap_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Opaque pixel copy into the slot, clipped at the canvas edges.
fn paste_photo(canvas: &mut RgbaImage, photo: &RgbImage, x: u32, y: u32) {
    for (px, py, p) in photo.enumerate_pixels() {
        let bx = x + px;
        let by = y + py;
        if bx < canvas.width() && by < canvas.height() {
            canvas.put_pixel(bx, by, Rgba([p.0[0], p.0[1], p.0[2], 255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_canvas(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn region_has_dark_pixels(img: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        for y in y0..y1 {
            for x in x0..x1 {
                let p = img.get_pixel(x, y);
                if p.0[0] < 128 {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn bitmap_text_marks_pixels_at_the_anchor() {
        let mut img = white_canvas(400, 100);
        draw_bitmap(&mut img, 4, (10, 10), Rgba([0, 0, 0, 255]), "RG: 12.345");
        assert!(region_has_dark_pixels(&img, 10, 10, 60, 42));
    }

    #[test]
    fn bitmap_text_clips_at_canvas_edges() {
        let mut img = white_canvas(40, 20);
        draw_bitmap(&mut img, 5, (-15, -15), Rgba([0, 0, 0, 255]), "XYZ");
        draw_bitmap(&mut img, 5, (30, 10), Rgba([0, 0, 0, 255]), "overflowing text");
    }

    #[test]
    fn non_latin_chars_fall_back_to_a_visible_glyph() {
        let mut img = white_canvas(60, 60);
        draw_bitmap(&mut img, 2, (2, 2), Rgba([0, 0, 0, 255]), "名");
        assert!(region_has_dark_pixels(&img, 0, 0, 60, 60));
    }

    #[test]
    fn paste_photo_copies_and_clips() {
        let mut canvas = white_canvas(100, 100);
        let photo = RgbImage::from_pixel(50, 50, image::Rgb([9, 9, 9]));
        paste_photo(&mut canvas, &photo, 80, 80);
        assert_eq!(canvas.get_pixel(85, 85).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(70, 70).0, [255, 255, 255, 255]);
    }
}
