//! Template compositor.
//!
//! Paints one credential: background, text blocks in authored order,
//! photo, QR. Only canvas allocation and the final encode are fatal;
//! every decorative step logs its failure and the render carries on.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use super::assets::{apply_template, default_qr_area, place_photo, place_qr};
use super::banner::{draw_banner, plan_banner};
use super::context::RenderContext;
use super::dimensions::CanvasDimensions;
use crate::canvas::{fill_rect, flatten, new_canvas};
use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::{AcreditaError, Result};
use crate::pdf::PdfArtifact;
use crate::template::{BlockField, BlockKind, ResolvedBlock, TextBlock};
use crate::text::{FontFace, FontLibrary, MetricsEngine, draw_text, find_max_font_size};
use crate::zones::{GridStrategy, render_zones_block};

/// Outcome of one text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReport {
    pub id: String,
    pub kind: BlockKind,
    pub field: Option<BlockField>,
    pub requested_size: f32,
    /// Size actually drawn; `None` when nothing was drawn.
    pub final_size: Option<f32>,
    pub zone_strategy: Option<GridStrategy>,
    pub skipped: Option<String>,
}

impl BlockReport {
    fn new(resolved: &ResolvedBlock<'_>) -> Self {
        Self {
            id: resolved.block.id.clone(),
            kind: resolved.kind,
            field: resolved.field,
            requested_size: resolved.block.font_size,
            final_size: None,
            zone_strategy: None,
            skipped: None,
        }
    }

    fn drawn(mut self, size: f32) -> Self {
        self.final_size = Some(size);
        self
    }

    fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.skipped = Some(reason.into());
        self
    }
}

/// What a render did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderReport {
    pub uuid: Uuid,
    pub generated_at: DateTime<Utc>,
    pub dimensions: CanvasDimensions,
    pub metrics_backend: &'static str,
    pub template_applied: bool,
    pub blocks: Vec<BlockReport>,
    pub photo_placed: bool,
    pub qr_placed: bool,
    pub image_path: Option<PathBuf>,
    pub pdf: Option<PdfArtifact>,
}

/// Renders credentials against one configuration.
///
/// Owns the font cache; one compositor per thread.
#[derive(Debug)]
pub struct Compositor {
    config: RenderConfig,
    fonts: FontLibrary,
    metrics: MetricsEngine,
}

impl Compositor {
    /// Validate the config, load the default font and probe metrics.
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let fonts = FontLibrary::new(&config)?;
        let metrics = MetricsEngine::probe(config.metrics_backend, fonts.default_face());
        Ok(Self {
            config,
            fonts,
            metrics,
        })
    }

    pub fn with_parts(config: RenderConfig, fonts: FontLibrary, metrics: MetricsEngine) -> Self {
        Self {
            config,
            fonts,
            metrics,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Compose the credential in memory.
    pub fn render(
        &mut self,
        ctx: &RenderContext,
        dims: &CanvasDimensions,
    ) -> Result<(RgbaImage, RenderReport)> {
        let mut canvas = new_canvas(dims.width, dims.height, Color::WHITE)?;
        let template_applied = self.apply_background(&mut canvas, ctx);

        let layout = &ctx.template.layout_meta;
        let blocks: Vec<BlockReport> = layout
            .resolved_blocks()
            .iter()
            .map(|resolved| self.render_block(&mut canvas, ctx, resolved))
            .collect();

        let photo_placed = self.apply_photo(&mut canvas, ctx, dims);
        let qr_placed = self.apply_qr(&mut canvas, ctx, dims);

        let report = RenderReport {
            uuid: ctx.uuid,
            generated_at: Utc::now(),
            dimensions: *dims,
            metrics_backend: self.metrics.backend_name(),
            template_applied,
            blocks,
            photo_placed,
            qr_placed,
            image_path: None,
            pdf: None,
        };
        Ok((canvas, report))
    }

    /// Compose and write the PNG to its deterministic path.
    pub fn render_to_file(&mut self, ctx: &RenderContext, dims: &CanvasDimensions) -> Result<RenderReport> {
        let (canvas, mut report) = self.render(ctx, dims)?;
        let path = self.config.image_path(&ctx.uuid);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        flatten(&canvas, Color::WHITE)
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| AcreditaError::Encode(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "credential image written uuid={} path={} size={}x{}",
            ctx.uuid,
            path.display(),
            dims.width,
            dims.height
        );
        report.image_path = Some(path);
        Ok(report)
    }

    fn apply_background(&self, canvas: &mut RgbaImage, ctx: &RenderContext) -> bool {
        if let Some(file) = &ctx.template.file_path {
            let path = self.config.resolve(file);
            match apply_template(canvas, &path) {
                Ok(()) => {
                    log::info!("template applied uuid={} path={}", ctx.uuid, path.display());
                    return true;
                }
                Err(e) => log::warn!(
                    "template skipped uuid={} path={} reason={}",
                    ctx.uuid,
                    path.display(),
                    e
                ),
            }
        }
        let (w, h) = canvas.dimensions();
        fill_rect(canvas, 0, 0, w as i64, h as i64, self.config.background_color);
        false
    }

    fn render_block(
        &mut self,
        canvas: &mut RgbaImage,
        ctx: &RenderContext,
        resolved: &ResolvedBlock<'_>,
    ) -> BlockReport {
        let report = BlockReport::new(resolved);
        let block = resolved.block;

        if resolved.kind == BlockKind::Zones {
            return match render_zones_block(
                canvas,
                block,
                &ctx.zones,
                &mut self.fonts,
                &self.metrics,
                self.config.supersample,
            ) {
                Ok(Some(plan)) => BlockReport {
                    zone_strategy: Some(plan.strategy),
                    ..report
                },
                Ok(None) => report.skipped("no zones"),
                Err(e) => {
                    log::warn!("zones skipped uuid={} block={} reason={}", ctx.uuid, block.id, e);
                    report.skipped(e.to_string())
                }
            };
        }

        let Some(field) = resolved.field else {
            log::info!("block skipped uuid={} block={} reason=unknown id", ctx.uuid, block.id);
            return report.skipped("unknown block id");
        };
        let text = field.resolve(ctx);
        if text.is_empty() {
            log::debug!("block empty uuid={} block={}", ctx.uuid, block.id);
            return report.skipped("empty text");
        }
        let font = match self.fonts.resolve(block.font.as_deref()) {
            Ok(font) => font,
            Err(e) => {
                log::warn!("block skipped uuid={} block={} reason={}", ctx.uuid, block.id, e);
                return report.skipped(e.to_string());
            }
        };

        let final_size = match resolved.kind {
            BlockKind::BannerText => {
                let plan = plan_banner(block, &text, &font, &self.metrics, canvas.width());
                if let Err(e) = draw_banner(canvas, block, &plan, &text, &font, self.config.supersample) {
                    log::warn!(
                        "banner background skipped uuid={} block={} reason={}",
                        ctx.uuid,
                        block.id,
                        e
                    );
                    self.draw_plain(canvas, block, &text, &font, plan.font_size);
                }
                plan.font_size
            }
            BlockKind::AutofitText => {
                let size = self.autofit_size(block, &text, &font);
                self.draw_plain(canvas, block, &text, &font, size);
                size
            }
            _ => {
                self.draw_plain(canvas, block, &text, &font, block.font_size);
                block.font_size
            }
        };

        log::info!(
            "block placed uuid={} block={} kind={:?} requested={} final={} x={} y={}",
            ctx.uuid,
            block.id,
            resolved.kind,
            block.font_size,
            final_size,
            block.x,
            block.y
        );
        report.drawn(final_size)
    }

    /// Authored size, or smaller if the text is wider than the block.
    fn autofit_size(&self, block: &TextBlock, text: &str, font: &FontFace) -> f32 {
        let Some(width) = block.width else {
            return block.font_size;
        };
        let bounds = self.metrics.measure(text, block.font_size, font);
        if bounds.width <= width {
            return block.font_size;
        }
        let fitted = find_max_font_size(&self.metrics, text, font, width, f32::INFINITY);
        (fitted as f32).min(block.font_size)
    }

    fn draw_plain(&self, canvas: &mut RgbaImage, block: &TextBlock, text: &str, font: &FontFace, size: f32) {
        let bounds = self.metrics.measure(text, size, font);
        let left = block.alignment.left_edge(block.x, bounds.width) - bounds.min_x;
        let color = block.color.unwrap_or(Color::BLACK);
        draw_text(canvas, font, text, size, left, block.y, color);
    }

    fn apply_photo(&self, canvas: &mut RgbaImage, ctx: &RenderContext, dims: &CanvasDimensions) -> bool {
        let Some(area) = ctx.template.layout_meta.photo else {
            return false;
        };
        let Some(photo) = &ctx.photo_path else {
            log::debug!("photo skipped uuid={} reason=no photo", ctx.uuid);
            return false;
        };
        let path = self.config.resolve(photo);
        match place_photo(canvas, &path, area, dims) {
            Ok(placed) => {
                log::info!(
                    "photo placed uuid={} at={:.0},{:.0} size={:.0}x{:.0}",
                    ctx.uuid,
                    placed.x,
                    placed.y,
                    placed.width,
                    placed.height
                );
                true
            }
            Err(e) => {
                log::warn!("photo skipped uuid={} path={} reason={}", ctx.uuid, path.display(), e);
                false
            }
        }
    }

    fn apply_qr(&self, canvas: &mut RgbaImage, ctx: &RenderContext, dims: &CanvasDimensions) -> bool {
        let Some(qr) = &ctx.qr_path else {
            log::debug!("qr skipped uuid={} reason=no qr", ctx.uuid);
            return false;
        };
        let path = self.config.resolve(qr);
        let area = match ctx.template.layout_meta.qr {
            Some(area) => area.scaled(dims.scale()),
            None => default_qr_area(dims, &self.config),
        };
        match place_qr(canvas, &path, area) {
            Ok(placed) => {
                log::info!(
                    "qr placed uuid={} at={:.0},{:.0} size={:.0}",
                    ctx.uuid,
                    placed.x,
                    placed.y,
                    placed.width
                );
                true
            }
            Err(e) => {
                log::warn!("qr skipped uuid={} path={} reason={}", ctx.uuid, path.display(), e);
                false
            }
        }
    }
}
