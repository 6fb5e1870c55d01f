//! Zone grid layout planning.
//!
//! Pure geometry: given how many badges to show and the box they live in,
//! pick a strategy and compute every cell rectangle. Rendering consumes
//! the plan with a single cell loop.
//!
//! | Zones | Strategy | Rows |
//! |-------|----------|------|
//! | 1–3 | Amplified | one row of N, larger cells |
//! | 6, 8 | Balanced | two rows of N/2 |
//! | other | Standard | rows of ≤ 5, each centered |

use serde::Serialize;

use crate::template::Area;

/// Cells per row in the standard layout.
pub const MAX_PER_ROW: usize = 5;
/// Cell height / cell width when the box height is not authored.
pub const DEFAULT_ASPECT: f32 = 1.35;
pub const DEFAULT_GAP: f32 = 8.0;
pub const DEFAULT_PADDING: f32 = 8.0;
/// Grid width when the block does not declare one.
pub const DEFAULT_GRID_WIDTH: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStrategy {
    Amplified,
    Balanced,
    Standard,
}

impl GridStrategy {
    pub fn for_count(count: usize) -> Self {
        match count {
            0..=3 => GridStrategy::Amplified,
            6 | 8 => GridStrategy::Balanced,
            _ => GridStrategy::Standard,
        }
    }

    /// Cells in each row, top to bottom.
    pub fn row_counts(self, count: usize) -> Vec<usize> {
        match self {
            GridStrategy::Amplified => vec![count],
            GridStrategy::Balanced => vec![count / 2, count - count / 2],
            GridStrategy::Standard => {
                let mut rows = vec![MAX_PER_ROW; count / MAX_PER_ROW];
                if count % MAX_PER_ROW != 0 {
                    rows.push(count % MAX_PER_ROW);
                }
                rows
            }
        }
    }
}

/// Box the grid is laid out in. `height` is optional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub gap: f32,
    pub padding: f32,
    pub aspect_ratio: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            padding: DEFAULT_PADDING,
            aspect_ratio: DEFAULT_ASPECT,
        }
    }
}

/// Resolved grid geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneGridPlan {
    pub strategy: GridStrategy,
    pub row_counts: Vec<usize>,
    pub cell_width: f32,
    pub cell_height: f32,
    /// One rect per zone, row-major.
    pub cells: Vec<Area>,
}

/// Width of `columns` cells sharing `width` after padding and gaps.
fn cell_width_for(width: f32, padding: f32, gap: f32, columns: usize) -> f32 {
    let columns = columns.max(1) as f32;
    (width - 2.0 * padding - (columns - 1.0) * gap) / columns
}

/// Plan a grid for `count` zones. `None` when there is nothing to draw.
pub fn plan_zone_grid(count: usize, area: GridArea, options: GridOptions) -> Option<ZoneGridPlan> {
    if count == 0 {
        return None;
    }
    let strategy = GridStrategy::for_count(count);
    let rows = strategy.row_counts(count);
    let gap = options.gap.max(0.0);
    let aspect = if options.aspect_ratio > 0.0 {
        options.aspect_ratio
    } else {
        DEFAULT_ASPECT
    };

    // A lone badge drops the padding and takes the width of one cell in a
    // two-column layout instead of the whole box.
    let (padding, cell_width) = if count == 1 {
        (0.0, cell_width_for(area.width, 0.0, gap, 2))
    } else {
        let columns = rows.iter().copied().max().unwrap_or(1);
        let padding = options.padding.max(0.0);
        (padding, cell_width_for(area.width, padding, gap, columns))
    };
    let cell_width = cell_width.max(1.0);

    let row_total = rows.len() as f32;
    let fitted_height = area
        .height
        .map(|h| (h - 2.0 * padding - (row_total - 1.0) * gap) / row_total);
    let natural_height = cell_width * aspect;
    let cell_height = match (strategy, fitted_height) {
        (GridStrategy::Amplified, Some(h)) => h,
        (_, Some(h)) => natural_height.min(h),
        (_, None) => natural_height,
    }
    .max(1.0);

    let mut cells = Vec::with_capacity(count);
    for (row, &in_row) in rows.iter().enumerate() {
        let row_width = in_row as f32 * cell_width + (in_row as f32 - 1.0) * gap;
        let row_x = area.x + (area.width - row_width) / 2.0;
        let row_y = area.y + padding + row as f32 * (cell_height + gap);
        for col in 0..in_row {
            cells.push(Area {
                x: row_x + col as f32 * (cell_width + gap),
                y: row_y,
                width: cell_width,
                height: cell_height,
            });
        }
    }

    Some(ZoneGridPlan {
        strategy,
        row_counts: rows,
        cell_width,
        cell_height,
        cells,
    })
}
