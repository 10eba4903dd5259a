//! Badge generation pipeline.
//!
//! `BadgeRequest -> photo normalization -> composition -> PNG bytes`. The
//! pipeline is a pure function of its inputs plus the read-only template and
//! font assets; recoverable conditions (bad photo, missing fonts) are
//! absorbed here and never abort a request.

pub mod compose;
pub mod encode;
pub mod font;
pub mod layout;
pub mod photo;
pub mod template;

use thiserror::Error;

pub use template::Template;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("template missing: {0}")]
    TemplateMissing(String),
    #[error("invalid photo: {0}")]
    InvalidPhoto(String),
    #[error("png encode: {0}")]
    Encode(String),
}

const NAME_MAX: usize = 50;
const ID_MAX: usize = 15;
const TAX_ID_MAX: usize = 14;

/// Identity fields plus the optional raw photo upload. Immutable once built.
#[derive(Debug, Clone)]
pub struct BadgeRequest {
    pub name: String,
    pub id_number: String,
    pub tax_id: String,
    pub photo: Option<Vec<u8>>,
}

impl BadgeRequest {
    pub fn validate(&self) -> Result<(), BadgeError> {
        check_field("name", &self.name, NAME_MAX)?;
        check_field("id_number", &self.id_number, ID_MAX)?;
        check_field("tax_id", &self.tax_id, TAX_ID_MAX)?;
        Ok(())
    }
}

fn check_field(field: &str, value: &str, max: usize) -> Result<(), BadgeError> {
    if value.trim().is_empty() {
        return Err(BadgeError::BadRequest(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(BadgeError::BadRequest(format!(
            "{field} too long: {len} chars (max {max})"
        )));
    }
    Ok(())
}

pub struct BadgeOutput {
    pub png: Vec<u8>,
    /// Set when an uploaded photo was rejected; the badge was still produced,
    /// just without it.
    pub photo_warning: Option<String>,
}

/// Run the whole pipeline for one request.
///
/// Photo failures are soft: the badge is generated without the photo and the
/// diagnostic is carried alongside the bytes. Template and encoder failures
/// are fatal and typed.
pub fn generate(template: &Template, request: &BadgeRequest) -> Result<BadgeOutput, BadgeError> {
    request.validate()?;

    let (slot_w, slot_h) = layout::PHOTO_SLOT;
    let mut photo_warning = None;
    let photo = match request.photo.as_deref() {
        None => None,
        Some(raw) => match photo::normalize(raw, slot_w, slot_h) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "photo rejected, generating badge without it");
                photo_warning = Some(e.to_string());
                None
            }
        },
    };

    let canvas = compose::compose(template, request, photo.as_ref());
    let png = encode::encode_png(&canvas)?;

    tracing::debug!(bytes = png.len(), with_photo = photo.is_some(), "badge generated");

    Ok(BadgeOutput { png, photo_warning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::io::Cursor;

    const TEMPLATE_W: u32 = 500;
    const TEMPLATE_H: u32 = 700;

    fn fixture_template(dir: &tempfile::TempDir) -> Template {
        let path = dir.path().join("template_cracha.jpg");
        let img = RgbaImage::from_pixel(
            TEMPLATE_W,
            TEMPLATE_H,
            image::Rgba([230, 230, 230, 255]),
        );
        image::DynamicImage::ImageRgba8(img).to_rgb8().save(&path).unwrap();
        Template::load(&path).unwrap()
    }

    fn request(photo: Option<Vec<u8>>) -> BadgeRequest {
        BadgeRequest {
            name: "Ana Silva".into(),
            id_number: "12.345.678-9".into(),
            tax_id: "123.456.789-00".into(),
            photo,
        }
    }

    fn jpeg_photo(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb([20, 40, 160]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    fn region_differs(a: &RgbaImage, b: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> bool {
        for y in y0..y1 {
            for x in x0..x1 {
                if a.get_pixel(x, y) != b.get_pixel(x, y) {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn badge_without_photo_keeps_template_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let out = generate(&template, &request(None)).unwrap();
        assert!(out.photo_warning.is_none());

        let decoded = image::load_from_memory(&out.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (TEMPLATE_W, TEMPLATE_H));
    }

    #[test]
    fn text_is_drawn_at_the_name_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let out = generate(&template, &request(None)).unwrap();
        let decoded = image::load_from_memory(&out.png).unwrap().to_rgba8();

        let untouched = template.canvas();
        assert!(region_differs(&decoded, &untouched, 50, 175, 200, 230));
        // the photo slot stays placeholder art when no photo was uploaded
        assert!(!region_differs(&decoded, &untouched, 220, 340, 445, 580));
    }

    #[test]
    fn photo_fills_the_slot_region() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let out = generate(&template, &request(Some(jpeg_photo(800, 600)))).unwrap();
        assert!(out.photo_warning.is_none());

        let decoded = image::load_from_memory(&out.png).unwrap().to_rgba8();
        let untouched = template.canvas();
        assert!(region_differs(&decoded, &untouched, 220, 340, 445, 580));

        // slot center carries photo data, not template background
        let p = decoded.get_pixel(330, 460);
        assert!(p.0[2] > p.0[0], "expected the blue test photo, got {:?}", p);
    }

    #[test]
    fn corrupt_photo_still_produces_a_badge_with_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let mut corrupt = jpeg_photo(800, 600);
        corrupt.truncate(40);

        let out = generate(&template, &request(Some(corrupt))).unwrap();
        assert!(out.photo_warning.is_some());

        let decoded = image::load_from_memory(&out.png).unwrap().to_rgba8();
        let untouched = template.canvas();
        // text drawn, photo slot untouched
        assert!(region_differs(&decoded, &untouched, 50, 175, 200, 230));
        assert!(!region_differs(&decoded, &untouched, 220, 340, 445, 580));
    }

    #[test]
    fn identical_requests_yield_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let req = request(Some(jpeg_photo(320, 240)));
        let a = generate(&template, &req).unwrap();
        let b = generate(&template, &req).unwrap();
        assert_eq!(a.png, b.png);
    }

    #[test]
    fn accented_names_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let template = fixture_template(&dir);

        let mut req = request(None);
        req.name = "José da Conceição".into();
        assert!(generate(&template, &req).is_ok());
    }

    #[test]
    fn validation_rejects_empty_and_oversized_fields() {
        let empty = BadgeRequest {
            name: "  ".into(),
            id_number: "1".into(),
            tax_id: "1".into(),
            photo: None,
        };
        assert!(matches!(empty.validate(), Err(BadgeError::BadRequest(_))));

        let long = BadgeRequest {
            name: "x".repeat(51),
            id_number: "1".into(),
            tax_id: "1".into(),
            photo: None,
        };
        assert!(matches!(long.validate(), Err(BadgeError::BadRequest(_))));

        // limits count characters, not bytes
        let unicode = BadgeRequest {
            name: "ã".repeat(50),
            id_number: "1".repeat(15),
            tax_id: "1".repeat(14),
            photo: None,
        };
        assert!(unicode.validate().is_ok());
    }
}
