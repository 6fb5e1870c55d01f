//! Raster assets: template background, employee photo, QR code.
//!
//! All of these are decorative. A missing or undecodable asset comes back
//! as an error that the compositor logs before moving on.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

use super::dimensions::CanvasDimensions;
use crate::config::RenderConfig;
use crate::error::{AcreditaError, Result};
use crate::template::Area;

/// ISO-BMFF brands phones write for HEIF stills and sequences.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"hevm", b"hevs", b"mif1", b"msf1",
];

/// Whether an uploaded employee photo is HEIF-encoded: `ftyp` box at
/// offset 4 followed by a HEIF major brand.
pub fn is_heic(data: &[u8]) -> bool {
    match (data.get(4..8), data.get(8..12)) {
        (Some(b"ftyp"), Some(brand)) => HEIF_BRANDS.iter().any(|b| b.as_slice() == brand),
        _ => false,
    }
}

/// Decode the primary image of a HEIF photo to RGB.
#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<DynamicImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let photo_err = |e: libheif_rs::HeifError| AcreditaError::Image(format!("HEIF photo: {}", e));
    let ctx = HeifContext::read_from_bytes(data).map_err(photo_err)?;
    let handle = ctx.primary_image_handle().map_err(photo_err)?;
    let decoded = LibHeif::new()
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(photo_err)?;

    let (width, height) = (decoded.width(), decoded.height());
    let plane = decoded
        .planes()
        .interleaved
        .ok_or_else(|| AcreditaError::Image("HEIF photo has no interleaved RGB plane".into()))?;
    let row_bytes = width as usize * 3;

    // Rows are padded to `stride`; copy only the pixel bytes
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        let row = row.get(..row_bytes).ok_or_else(|| {
            AcreditaError::Image(format!("HEIF photo row shorter than {} bytes", row_bytes))
        })?;
        pixels.extend_from_slice(row);
    }
    image::RgbImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| AcreditaError::Image(format!("HEIF photo truncated at {}x{}", width, height)))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<DynamicImage> {
    Err(AcreditaError::Image(
        "HEIF photo found but built without the `heif` feature".into(),
    ))
}

/// Load PNG/JPEG (and HEIC with the `heif` feature) from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if is_heic(&bytes) || matches!(ext.as_deref(), Some("heic" | "heif")) {
        return decode_heic(&bytes);
    }
    Ok(image::load_from_memory(&bytes)?)
}

/// Paint the template image stretched over the whole canvas.
pub fn apply_template(canvas: &mut RgbaImage, path: &Path) -> Result<()> {
    let template = load_image(path)?;
    let (w, h) = canvas.dimensions();
    let resized = imageops::resize(&template.to_rgba8(), w, h, FilterType::Lanczos3);
    imageops::replace(canvas, &resized, 0, 0);
    Ok(())
}

/// Place the photo cropped to fill `area` (template units, scaled to canvas).
pub fn place_photo(canvas: &mut RgbaImage, path: &Path, area: Area, dims: &CanvasDimensions) -> Result<Area> {
    let target = area.scaled(dims.scale());
    let (w, h) = (target.width.round() as u32, target.height.round() as u32);
    if w == 0 || h == 0 {
        return Err(AcreditaError::Image(format!("photo area is empty: {}x{}", w, h)));
    }
    let photo = load_image(path)?.resize_to_fill(w, h, FilterType::Lanczos3);
    imageops::overlay(canvas, &photo.to_rgba8(), target.x.round() as i64, target.y.round() as i64);
    Ok(target)
}

/// Default QR placement: bottom-right corner, sized relative to the
/// default canvas width.
pub fn default_qr_area(dims: &CanvasDimensions, config: &RenderConfig) -> Area {
    let factor = dims.width as f32 / config.default_width.max(1) as f32;
    let size = (config.qr_size as f32 * factor).round();
    let margin = (config.qr_margin as f32 * factor).round();
    Area {
        x: dims.width as f32 - margin - size,
        y: dims.height as f32 - margin - size,
        width: size,
        height: size,
    }
}

/// Place the QR image into `area` (already in canvas pixels).
pub fn place_qr(canvas: &mut RgbaImage, path: &Path, area: Area) -> Result<Area> {
    let (w, h) = (area.width.round() as u32, area.height.round() as u32);
    if w == 0 || h == 0 {
        return Err(AcreditaError::Image(format!("QR area is empty: {}x{}", w, h)));
    }
    // Nearest keeps module edges crisp for scanners
    let qr = imageops::resize(&load_image(path)?.to_rgba8(), w, h, FilterType::Nearest);
    imageops::overlay(canvas, &qr, area.x.round() as i64, area.y.round() as i64);
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::new_canvas;
    use crate::color::Color;
    use image::Rgba;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("acredita-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_is_heic_magic() {
        let mut data = vec![0u8, 0, 0, 24];
        data.extend_from_slice(b"ftypheic");
        assert!(is_heic(&data));
        assert!(!is_heic(b"\x89PNG\r\n\x1a\n0000"));
        assert!(!is_heic(b"short"));
    }

    #[cfg(not(feature = "heif"))]
    #[test]
    fn test_heif_photo_without_feature_is_image_error() {
        let dir = temp_dir();
        let path = dir.join("selfie.heic");
        let mut data = vec![0u8, 0, 0, 24];
        data.extend_from_slice(b"ftypmif1");
        std::fs::write(&path, &data).unwrap();
        let result = load_image(&path);
        std::fs::remove_dir_all(&dir).ok();
        assert!(matches!(result, Err(AcreditaError::Image(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_image(Path::new("/nonexistent/acredita/photo.jpg")),
            Err(AcreditaError::Io(_))
        ));
    }

    #[test]
    fn test_default_qr_area_scales_with_width() {
        let config = RenderConfig::default();
        let dims = CanvasDimensions::default_for(&config);
        let area = default_qr_area(&dims, &config);
        assert_eq!(area, Area { x: 820.0, y: 1244.0, width: 180.0, height: 180.0 });

        let half = CanvasDimensions::scaled_from(512, 724, 724);
        let area = default_qr_area(&half, &config);
        assert_eq!(area.width, 90.0);
        assert_eq!(area.x, 512.0 - 12.0 - 90.0);
    }

    #[test]
    fn test_photo_fills_scaled_area() {
        let dir = temp_dir();
        let path = dir.join("photo.png");
        image::RgbImage::from_pixel(40, 80, image::Rgb([10, 200, 30])).save(&path).unwrap();

        let mut canvas = new_canvas(200, 200, Color::WHITE).unwrap();
        // Template authored at 400 wide, canvas is 200: everything halves.
        let dims = CanvasDimensions::scaled_from(400, 400, 200);
        let area = Area { x: 100.0, y: 100.0, width: 120.0, height: 120.0 };
        let placed = place_photo(&mut canvas, &path, area, &dims).unwrap();
        assert_eq!(placed, Area { x: 50.0, y: 50.0, width: 60.0, height: 60.0 });
        assert_eq!(*canvas.get_pixel(50, 50), Rgba([10, 200, 30, 255]));
        assert_eq!(*canvas.get_pixel(109, 109), Rgba([10, 200, 30, 255]));
        assert_eq!(*canvas.get_pixel(111, 111), Rgba([255, 255, 255, 255]));
        std::fs::remove_dir_all(&dir).ok();
    }
}
