use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Longest side handed to the OCR engine. Tesseract works best around
/// 300 DPI, which puts a phone photo of a receipt near this size.
pub const MAX_DIMENSION: u32 = 2800;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Load an image file, normalize it and return PNG bytes ready for OCR.
pub fn prepare_for_ocr(path: &Path) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_png(&normalize(img))
}

/// Decode JPEG / PNG / WEBP / … bytes and return normalized PNG bytes.
pub fn prepare_for_ocr_from_bytes(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_png(&normalize(img))
}

fn normalize(img: DynamicImage) -> GrayImage {
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };
    stretch_contrast(img.to_luma8())
}

/// Map the darkest pixel to black and the lightest to white.
fn stretch_contrast(mut gray: GrayImage) -> GrayImage {
    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if hi <= lo {
        return gray;
    }

    let range = u32::from(hi - lo);
    let mut table = [0u8; 256];
    for (v, slot) in table.iter_mut().enumerate().skip(usize::from(lo)) {
        let offset = (v as u32).min(u32::from(hi)) - u32::from(lo);
        *slot = (offset * 255 / range) as u8;
    }
    for p in gray.pixels_mut() {
        p[0] = table[usize::from(p[0])];
    }
    gray
}

fn encode_png(img: &GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
