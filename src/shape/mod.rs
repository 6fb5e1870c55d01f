//! Vector-ish shapes rasterized into RGBA layers.

pub mod rounded_rect;

pub use rounded_rect::{RoundedRectSpec, make_rounded_rect_layer};
