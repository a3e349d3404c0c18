//! Paint data consumed by the renderer sink.

mod color;

pub use color::Color;
