//! # Zones Grid
//!
//! Renders a credential's authorized zones as a grid of numbered rounded
//! badges. Layout comes from [`plan_zone_grid`]; this module only paints.

pub mod plan;

use image::RgbaImage;

use crate::canvas::composite;
use crate::color::Color;
use crate::error::{AcreditaError, Result};
use crate::shape::{RoundedRectSpec, make_rounded_rect_layer};
use crate::snapshot::ZoneSnapshot;
use crate::template::TextBlock;
use crate::text::{FontLibrary, MetricsEngine, draw_text, find_max_font_size};

pub use plan::{
    DEFAULT_GRID_WIDTH, GridArea, GridOptions, GridStrategy, ZoneGridPlan, plan_zone_grid,
};

/// Share of the cell the number may occupy on each axis.
const NUMBER_BOX: f32 = 0.7;
/// Corner radius as a fraction of the shorter cell side.
const BADGE_RADIUS: f32 = 0.18;

/// Grid geometry inputs taken from a block.
pub fn grid_inputs(block: &TextBlock) -> (GridArea, GridOptions) {
    let defaults = GridOptions::default();
    let area = GridArea {
        x: block.x,
        y: block.y,
        width: block.width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_GRID_WIDTH),
        height: block.height.filter(|h| *h > 0.0),
    };
    let options = GridOptions {
        gap: block.gap.unwrap_or(defaults.gap),
        padding: block.padding.unwrap_or(defaults.padding),
        aspect_ratio: block.aspect_ratio.unwrap_or(defaults.aspect_ratio),
    };
    (area, options)
}

/// Draw the zones grid for `block`. `Ok(None)` when there are no zones.
pub fn render_zones_block(
    canvas: &mut RgbaImage,
    block: &TextBlock,
    zones: &[ZoneSnapshot],
    fonts: &mut FontLibrary,
    metrics: &MetricsEngine,
    supersample: u32,
) -> Result<Option<ZoneGridPlan>> {
    let mut zones: Vec<&ZoneSnapshot> = zones.iter().collect();
    zones.sort_by_key(|z| z.id);
    if zones.is_empty() {
        log::info!("zones grid skipped block={} reason=no zones", block.id);
        return Ok(None);
    }

    let font = fonts.resolve(block.font.as_deref())?;
    let (area, options) = grid_inputs(block);
    let plan = plan_zone_grid(zones.len(), area, options)
        .ok_or_else(|| AcreditaError::Zones(format!("no grid for {} zones", zones.len())))?;

    let labels: Vec<String> = zones.iter().map(|z| z.id.to_string()).collect();
    let max_w = plan.cell_width * NUMBER_BOX;
    let max_h = plan.cell_height * NUMBER_BOX;
    let font_size = labels
        .iter()
        .map(|label| find_max_font_size(metrics, label, &font, max_w, max_h))
        .min()
        .unwrap_or(1) as f32;

    let radius = block
        .border_radius
        .unwrap_or(plan.cell_width.min(plan.cell_height) * BADGE_RADIUS);
    let stroke = block.border_color.unwrap_or(Color::TRANSPARENT);
    let stroke_width = match block.border_color {
        Some(_) => block.border_width.unwrap_or(2.0),
        None => 0.0,
    };
    let text_color = block.text_color.unwrap_or(Color::WHITE);

    for ((zone, label), cell) in zones.iter().zip(&labels).zip(&plan.cells) {
        let spec = RoundedRectSpec {
            width: cell.width.round().max(1.0) as u32,
            height: cell.height.round().max(1.0) as u32,
            radius,
            fill: zone.color.or(block.background_color).unwrap_or(Color::SLATE),
            stroke,
            stroke_width,
            shadow: false,
            ..Default::default()
        };
        let layer = make_rounded_rect_layer(&spec, supersample)?;
        composite(canvas, &layer, cell.x.round() as i64, cell.y.round() as i64);

        let bounds = metrics.measure(label, font_size, &font);
        let left = cell.x + (cell.width - bounds.width) / 2.0 - bounds.min_x;
        let baseline = cell.y + (cell.height - bounds.height) / 2.0 - bounds.min_y;
        draw_text(canvas, &font, label, font_size, left, baseline, text_color);
    }

    log::info!(
        "zones grid rendered block={} count={} strategy={:?} rows={:?} cell={:.0}x{:.0} font_size={}",
        block.id,
        zones.len(),
        plan.strategy,
        plan.row_counts,
        plan.cell_width,
        plan.cell_height,
        font_size
    );
    Ok(Some(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::new_canvas;
    use image::Rgba;

    fn zone(id: i64, color: Option<Color>) -> ZoneSnapshot {
        ZoneSnapshot {
            id,
            name: format!("Zona {}", id),
            color,
            capacity: None,
        }
    }

    fn zones_block() -> TextBlock {
        let mut block = TextBlock::new("zones", 20.0, 20.0, 24.0);
        block.width = Some(300.0);
        block
    }

    #[test]
    fn test_empty_zones_draw_nothing() {
        let mut canvas = new_canvas(400, 400, Color::WHITE).unwrap();
        let before = canvas.clone();
        let plan = render_zones_block(
            &mut canvas,
            &zones_block(),
            &[],
            &mut FontLibrary::builtin(),
            &MetricsEngine::cell(),
            2,
        )
        .unwrap();
        assert!(plan.is_none());
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_badges_painted_in_zone_color() {
        let red = Color::rgb(200, 0, 0);
        let mut canvas = new_canvas(400, 600, Color::WHITE).unwrap();
        let plan = render_zones_block(
            &mut canvas,
            &zones_block(),
            &[zone(7, None), zone(3, Some(red))],
            &mut FontLibrary::builtin(),
            &MetricsEngine::cell(),
            2,
        )
        .unwrap()
        .unwrap();

        assert_eq!(plan.strategy, GridStrategy::Amplified);
        assert_eq!(plan.cells.len(), 2);
        // Sorted by id: zone 3 (red) first, zone 7 (default slate) second.
        let first = plan.cells[0];
        let second = plan.cells[1];
        // Top middle of the badge: inside the fill, above the number.
        let top_middle =
            |c: crate::template::Area| ((c.x + c.width / 2.0) as u32, (c.y + 6.0) as u32);
        let (x, y) = top_middle(first);
        assert_eq!(*canvas.get_pixel(x, y), Rgba([200, 0, 0, 255]));
        let (x, y) = top_middle(second);
        assert_eq!(*canvas.get_pixel(x, y), Color::SLATE.to_rgba());
    }

    #[test]
    fn test_numbers_drawn_inside_cells() {
        let mut canvas = new_canvas(400, 600, Color::rgb(128, 128, 128)).unwrap();
        let plan = render_zones_block(
            &mut canvas,
            &zones_block(),
            &[zone(1, Some(Color::BLACK))],
            &mut FontLibrary::builtin(),
            &MetricsEngine::cell(),
            2,
        )
        .unwrap()
        .unwrap();
        let cell = plan.cells[0];
        let white_inside = (cell.y as u32..(cell.y + cell.height) as u32).any(|y| {
            (cell.x as u32..(cell.x + cell.width) as u32)
                .any(|x| *canvas.get_pixel(x, y) == Rgba([255, 255, 255, 255]))
        });
        assert!(white_inside, "number glyphs should be painted white over the badge");
    }

    #[test]
    fn test_missing_block_font_errors() {
        let mut block = zones_block();
        block.font = Some("NoSuchFont".into());
        let mut canvas = new_canvas(100, 100, Color::WHITE).unwrap();
        let result = render_zones_block(
            &mut canvas,
            &block,
            &[zone(1, None)],
            &mut FontLibrary::builtin(),
            &MetricsEngine::cell(),
            2,
        );
        assert!(matches!(result, Err(AcreditaError::Font(_))));
    }

    #[test]
    fn test_grid_inputs_from_block() {
        let mut block = zones_block();
        block.gap = Some(4.0);
        block.height = Some(0.0);
        let (area, options) = grid_inputs(&block);
        assert_eq!(area.width, 300.0);
        assert_eq!(area.height, None);
        assert_eq!(options.gap, 4.0);
        assert_eq!(options.aspect_ratio, plan::DEFAULT_ASPECT);
    }

    #[test]
    fn test_oversized_grid_is_an_error() {
        let mut block = zones_block();
        block.width = Some(3.0e9);
        let mut canvas = new_canvas(200, 200, Color::WHITE).unwrap();
        let before = canvas.clone();
        let result = render_zones_block(
            &mut canvas,
            &block,
            &[zone(1, None)],
            &mut FontLibrary::builtin(),
            &MetricsEngine::cell(),
            3,
        );
        assert!(matches!(result, Err(AcreditaError::Shape(_))));
        assert_eq!(canvas, before);
    }
}
