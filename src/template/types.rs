//! Template layout metadata types.
//!
//! `layout_meta` arrives as JSON authored in the template editor; the
//! authored types deserialize from it directly.

use serde::{Deserialize, Serialize};

use super::fields::BlockField;
use crate::color::Color;

fn default_font_size() -> f32 {
    24.0
}

/// Horizontal anchoring of a block's `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the horizontal center.
    Center,
    /// `x` is the right edge.
    Right,
}

impl Alignment {
    /// Left edge of content `width` wide anchored at `x`.
    pub fn left_edge(self, x: f32, width: f32) -> f32 {
        match self {
            Alignment::Left => x,
            Alignment::Center => x - width / 2.0,
            Alignment::Right => x - width,
        }
    }
}

/// Authored block type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Text,
    Zones,
    #[serde(other)]
    Unknown,
}

/// A rectangle in template pixel units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn scaled(self, factor: f32) -> Area {
        Area {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Per-side padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Default banner padding (vertical, horizontal).
const BANNER_PADDING: (f32, f32) = (8.0, 16.0);

/// One positioned text element of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub x: f32,
    /// Baseline for text blocks, top edge for zone grids.
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default, alias = "align")]
    pub alignment: Alignment,
    /// Font file path or name; `None` uses the default face.
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub color: Option<Color>,

    // Banner
    #[serde(default)]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub padding: Option<f32>,
    #[serde(default)]
    pub padding_top: Option<f32>,
    #[serde(default)]
    pub padding_right: Option<f32>,
    #[serde(default)]
    pub padding_bottom: Option<f32>,
    #[serde(default)]
    pub padding_left: Option<f32>,
    #[serde(default)]
    pub fixed_width: Option<f32>,
    #[serde(default)]
    pub max_width: Option<f32>,
    #[serde(default)]
    pub border_radius: Option<f32>,
    #[serde(default)]
    pub offset_y: Option<f32>,

    /// Autofit box, or the grid box for zones.
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,

    // Zones grid
    #[serde(default)]
    pub gap: Option<f32>,
    #[serde(default)]
    pub aspect_ratio: Option<f32>,
    #[serde(default)]
    pub border_color: Option<Color>,
    #[serde(default)]
    pub border_width: Option<f32>,
    #[serde(default)]
    pub text_color: Option<Color>,
}

impl TextBlock {
    /// A plain block with defaults for everything but id and position.
    pub fn new(id: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            id: id.into(),
            block_type: BlockType::Text,
            x,
            y,
            font_size,
            alignment: Alignment::Left,
            font: None,
            color: None,
            background_color: None,
            padding: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            fixed_width: None,
            max_width: None,
            border_radius: None,
            offset_y: None,
            width: None,
            height: None,
            gap: None,
            aspect_ratio: None,
            border_color: None,
            border_width: None,
            text_color: None,
        }
    }

    /// Banner padding: per-side values override the uniform `padding`.
    pub fn padding(&self) -> Padding {
        let (v, h) = self
            .padding
            .map(|p| (p, p))
            .unwrap_or(BANNER_PADDING);
        Padding {
            top: self.padding_top.unwrap_or(v),
            right: self.padding_right.unwrap_or(h),
            bottom: self.padding_bottom.unwrap_or(v),
            left: self.padding_left.unwrap_or(h),
        }
    }

    /// Field this block displays, from its id.
    pub fn field(&self) -> Option<BlockField> {
        BlockField::from_id(&self.id)
    }

    /// Rendering strategy. Exactly one applies per block.
    pub fn kind(&self) -> BlockKind {
        if self.block_type == BlockType::Zones || self.id.eq_ignore_ascii_case("zones") {
            return BlockKind::Zones;
        }
        let field = self.field();
        if field == Some(BlockField::Provider) && self.background_color.is_some() {
            return BlockKind::BannerText;
        }
        if field.is_some_and(BlockField::is_autofit) && self.width.is_some() && self.height.is_some() {
            return BlockKind::AutofitText;
        }
        BlockKind::PlainText
    }
}

/// How a block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Dynamic grid of zone badges.
    Zones,
    /// Text on a colored banner sized to the text.
    BannerText,
    /// Text shrunk to a declared width when too long.
    AutofitText,
    /// Text at the authored size.
    PlainText,
}

/// Layout metadata of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMeta {
    pub text_blocks: Vec<TextBlock>,
    pub photo: Option<Area>,
    pub qr: Option<Area>,
    /// Canvas size the template was authored against (informational).
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A block with its strategy resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBlock<'a> {
    pub kind: BlockKind,
    pub field: Option<BlockField>,
    pub block: &'a TextBlock,
}

impl LayoutMeta {
    /// Layout used when a record carries no template, authored against
    /// the default 1024 × 1448 portrait canvas.
    pub fn default_layout() -> Self {
        let centered = |id: &str, y: f32, font_size: f32| {
            let mut block = TextBlock::new(id, 512.0, y, font_size);
            block.alignment = Alignment::Center;
            block.width = Some(900.0);
            block.height = Some(font_size * 1.25);
            block
        };

        let mut provider = TextBlock::new("proveedor", 512.0, 790.0, 36.0);
        provider.alignment = Alignment::Center;
        provider.background_color = Some(Color::rgb(0x1E, 0x3A, 0x8A));

        let mut zones = TextBlock::new("zones", 112.0, 860.0, 24.0);
        zones.block_type = BlockType::Zones;
        zones.width = Some(800.0);
        zones.height = Some(330.0);

        Self {
            text_blocks: vec![
                centered("nombre", 600.0, 56.0),
                centered("rol", 660.0, 32.0),
                centered("empresa", 710.0, 28.0),
                provider,
                zones,
                TextBlock::new("evento", 60.0, 1300.0, 28.0),
                TextBlock::new("documento", 60.0, 1350.0, 22.0),
            ],
            photo: Some(Area {
                x: 362.0,
                y: 120.0,
                width: 300.0,
                height: 380.0,
            }),
            qr: Some(Area {
                x: 820.0,
                y: 1244.0,
                width: 180.0,
                height: 180.0,
            }),
            width: Some(1024),
            height: Some(1448),
        }
    }

    /// Resolve every block's strategy once, in authored order.
    pub fn resolved_blocks(&self) -> Vec<ResolvedBlock<'_>> {
        self.text_blocks
            .iter()
            .map(|block| ResolvedBlock {
                kind: block.kind(),
                field: block.field(),
                block,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn block(json: &str) -> TextBlock {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_block_defaults() {
        let b = block(r#"{"id": "nombre", "x": 50, "y": 50}"#);
        assert_eq!(b.font_size, 24.0);
        assert_eq!(b.alignment, Alignment::Left);
        assert_eq!(b.kind(), BlockKind::PlainText);
    }

    #[test]
    fn test_kind_resolution() {
        assert_eq!(block(r#"{"id": "zones"}"#).kind(), BlockKind::Zones);
        assert_eq!(
            block(r#"{"id": "grid", "type": "zones"}"#).kind(),
            BlockKind::Zones
        );
        assert_eq!(
            block(r##"{"id": "proveedor", "background_color": "#1E3A8A"}"##).kind(),
            BlockKind::BannerText
        );
        assert_eq!(
            block(r#"{"id": "proveedor", "width": 300, "height": 40}"#).kind(),
            BlockKind::AutofitText
        );
        assert_eq!(
            block(r#"{"id": "nombre", "width": 300}"#).kind(),
            BlockKind::PlainText
        );
        assert_eq!(
            block(r#"{"id": "empresa", "width": 300, "height": 40}"#).kind(),
            BlockKind::PlainText
        );
        assert_eq!(
            block(r#"{"id": "x", "type": "sparkles"}"#).block_type,
            BlockType::Unknown
        );
    }

    #[test]
    fn test_default_layout_places_identity_blocks() {
        let layout = LayoutMeta::default_layout();
        let kinds: Vec<(&str, BlockKind)> = layout
            .resolved_blocks()
            .iter()
            .map(|r| (r.block.id.as_str(), r.kind))
            .collect();
        assert!(kinds.contains(&("nombre", BlockKind::AutofitText)));
        assert!(kinds.contains(&("rol", BlockKind::AutofitText)));
        assert!(kinds.contains(&("proveedor", BlockKind::BannerText)));
        assert!(kinds.contains(&("zones", BlockKind::Zones)));
        assert!(layout.photo.is_some());

        let qr = layout.qr.unwrap();
        assert!(qr.x + qr.width <= 1024.0 && qr.y + qr.height <= 1448.0);
    }

    #[test]
    fn test_padding_overrides() {
        let mut b = TextBlock::new("proveedor", 0.0, 0.0, 20.0);
        b.background_color = Some(Color::BLACK);
        assert_eq!(b.padding().left, 16.0);
        assert_eq!(b.padding().top, 8.0);
        b.padding = Some(5.0);
        b.padding_left = Some(2.0);
        let p = b.padding();
        assert_eq!((p.top, p.right, p.bottom, p.left), (5.0, 5.0, 5.0, 2.0));
    }

    #[test]
    fn test_alignment_left_edge() {
        assert_eq!(Alignment::Left.left_edge(100.0, 40.0), 100.0);
        assert_eq!(Alignment::Center.left_edge(100.0, 40.0), 80.0);
        assert_eq!(Alignment::Right.left_edge(100.0, 40.0), 60.0);
    }

    #[test]
    fn test_area_scaling() {
        let a = Area {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(
            a.scaled(0.5),
            Area {
                x: 5.0,
                y: 10.0,
                width: 50.0,
                height: 25.0
            }
        );
    }
}
