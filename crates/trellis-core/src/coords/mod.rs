//! Logical-pixel geometry used by arrangement and hit-testing.

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
