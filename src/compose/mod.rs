//! # Compose
//!
//! Turns a [`CredentialRecord`] into a PNG and a print-exact PDF.
//!
//! ```text
//! CredentialRecord ─► RenderContext ─► detect_dimensions ─► Compositor ─► PNG ─► wrap_as_pdf ─► PDF
//! ```

pub mod assets;
pub mod banner;
pub mod compositor;
pub mod context;
pub mod dimensions;

use std::path::PathBuf;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::pdf::{PdfArtifact, wrap_as_pdf};
use crate::snapshot::CredentialRecord;

pub use banner::{BannerPlan, plan_banner};
pub use compositor::{BlockReport, Compositor, RenderReport};
pub use context::RenderContext;
pub use dimensions::{CanvasDimensions, Orientation, detect_dimensions};

/// Files produced for one credential.
#[derive(Debug, Clone)]
pub struct CredentialArtifacts {
    pub image_path: PathBuf,
    pub pdf: Option<PdfArtifact>,
    pub report: RenderReport,
}

/// Render a credential with a fresh compositor.
///
/// Output paths are keyed by the credential uuid, so re-running overwrites
/// the previous artifacts.
pub fn generate_credential(record: &CredentialRecord, config: &RenderConfig) -> Result<CredentialArtifacts> {
    let mut compositor = Compositor::new(config.clone())?;
    generate_with(&mut compositor, record)
}

/// Render a credential with an existing compositor (shares its font cache).
pub fn generate_with(compositor: &mut Compositor, record: &CredentialRecord) -> Result<CredentialArtifacts> {
    let ctx = RenderContext::from_record(record);
    let config = compositor.config().clone();
    let dims = detect_dimensions(Some(&ctx.template), &config);

    let mut report = compositor.render_to_file(&ctx, &dims)?;
    let image_path = config.image_path(&ctx.uuid);
    let pdf = wrap_as_pdf(&image_path, &config.pdf_path(&ctx.uuid), config.pdf_dpi)?;
    report.pdf = pdf.clone();

    log::info!(
        "credential generated uuid={} image={} pdf={}",
        ctx.uuid,
        image_path.display(),
        pdf.as_ref()
            .map(|p| p.path.display().to_string())
            .unwrap_or_else(|| "none".into())
    );
    Ok(CredentialArtifacts {
        image_path,
        pdf,
        report,
    })
}
