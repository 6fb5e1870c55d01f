//! # PDF Wrapper
//!
//! Wraps a rendered credential raster into a single-page PDF whose page is
//! exactly the raster's physical size at the reference DPI. No margins, no
//! scaling: the image XObject fills the page.
//!
//! ```text
//! mm = px * 25.4 / dpi
//! pt = px * 72 / dpi
//! ```

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, Stream, dictionary};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compose::Orientation;
use crate::error::{AcreditaError, Result};

const MM_PER_INCH: f32 = 25.4;
const PT_PER_INCH: f32 = 72.0;
const PRODUCER: &str = concat!("acredita ", env!("CARGO_PKG_VERSION"));

/// A written PDF and its page geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfArtifact {
    pub path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub width_pt: f32,
    pub height_pt: f32,
    pub orientation: Orientation,
}

/// Physical page size of a `width` × `height` px raster at `dpi`.
pub fn page_size_mm(width: u32, height: u32, dpi: f32) -> (f32, f32) {
    (
        width as f32 * MM_PER_INCH / dpi,
        height as f32 * MM_PER_INCH / dpi,
    )
}

/// Wrap `raster_path` into `pdf_path`. `Ok(None)` when the raster is absent.
pub fn wrap_as_pdf(raster_path: &Path, pdf_path: &Path, dpi: f32) -> Result<Option<PdfArtifact>> {
    if !raster_path.is_file() {
        log::warn!("pdf skipped raster={} reason=missing raster", raster_path.display());
        return Ok(None);
    }
    let raster = image::open(raster_path)?.to_rgb8();
    let (px_w, px_h) = raster.dimensions();

    let (width_mm, height_mm) = page_size_mm(px_w, px_h, dpi);
    if !(width_mm > 0.0 && height_mm > 0.0 && width_mm.is_finite() && height_mm.is_finite()) {
        return Err(AcreditaError::Pdf(format!(
            "invalid page size {:.2}x{:.2} mm ({}x{} px at {} dpi)",
            width_mm, height_mm, px_w, px_h, dpi
        )));
    }
    let width_pt = width_mm * PT_PER_INCH / MM_PER_INCH;
    let height_pt = height_mm * PT_PER_INCH / MM_PER_INCH;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raster.as_raw())?;
    let compressed = encoder.finish()?;

    let title = raster_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => px_w as i64,
            "Height" => px_h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        compressed,
    ));

    let content = format!("q {} 0 0 {} 0 0 cm /Im1 Do Q\n", width_pt, height_pt).into_bytes();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width_pt.into()),
        Object::Real(height_pt.into()),
    ];
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im1" => image_id,
            },
        },
        "MediaBox" => Object::Array(media_box),
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(
            chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    if let Some(parent) = pdf_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    doc.save(pdf_path)
        .map_err(|e| AcreditaError::Pdf(format!("write {}: {}", pdf_path.display(), e)))?;

    let orientation = Orientation::of(px_w, px_h);
    log::info!(
        "pdf written path={} px={}x{} mm={:.2}x{:.2} orientation={:?}",
        pdf_path.display(),
        px_w,
        px_h,
        width_mm,
        height_mm,
        orientation
    );
    Ok(Some(PdfArtifact {
        path: pdf_path.to_path_buf(),
        pixel_width: px_w,
        pixel_height: px_h,
        width_mm,
        height_mm,
        width_pt,
        height_pt,
        orientation,
    }))
}
