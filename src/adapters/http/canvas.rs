use base64::{prelude::BASE64_STANDARD, Engine};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::preprocess::RawImage;

/// Decodifica la instantánea del canvas enviada por el navegador
/// (`canvas.toDataURL()`), con o sin la cabecera `data:image/png;base64,`.
pub fn decode_snapshot(payload: &str) -> DomainResult<RawImage> {
    let payload = payload.trim();
    let encoded = match payload.split_once(',') {
        Some((header, body)) if header.starts_with("data:") => body,
        _ => payload,
    };

    let bytes = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| DomainError::InvalidInput(format!("base64 inválido: {e}")))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| DomainError::InvalidInput(format!("imagen ilegible: {e}")))?;

    Ok(RawImage::from_rgba(img.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_base64(img: &RgbaImage) -> String {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        BASE64_STANDARD.encode(buf.into_inner())
    }

    #[test]
    fn decodes_plain_and_data_url_payloads() {
        let mut img = RgbaImage::from_pixel(12, 8, Rgba([255, 255, 255, 255]));
        img.put_pixel(3, 4, Rgba([0, 0, 0, 255]));
        let encoded = png_base64(&img);

        for payload in [encoded.clone(), format!("data:image/png;base64,{encoded}")] {
            let raw = decode_snapshot(&payload).unwrap();
            assert_eq!((raw.width(), raw.height()), (12, 8));
            assert_eq!(raw.as_rgba().get_pixel(3, 4), &Rgba([0, 0, 0, 255]));
        }
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(matches!(decode_snapshot("@@@"), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let payload = BASE64_STANDARD.encode(b"hello");
        assert!(matches!(decode_snapshot(&payload), Err(DomainError::InvalidInput(_))));
    }
}
