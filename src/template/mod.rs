//! # Template Layout
//!
//! `layout_meta` types and the block id → field mapping.

pub mod fields;
pub mod types;

pub use fields::{BlockField, zone_list, zone_number};
pub use types::{Alignment, Area, BlockKind, BlockType, LayoutMeta, Padding, ResolvedBlock, TextBlock};
