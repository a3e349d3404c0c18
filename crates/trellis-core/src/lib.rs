//! Shared foundation for the trellis UI crates.
//!
//! Holds the pieces every layer needs and none should own twice: logical
//! pixel geometry ([`coords`]), color ([`paint`]), the declarative style
//! types with their attribute-string grammars ([`style`]), and logger
//! setup ([`logging`]).
//!
//! This crate knows nothing about elements, bindings, or rendering — it is
//! consumed by `trellis-reflect` and `trellis-ui` alike.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod style;

pub use coords::{Rect, Vec2};
pub use paint::Color;
pub use style::{Alignment, Margin, Orientation, Size, SizePair};
