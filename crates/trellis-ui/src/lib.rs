//! Visual element tree, layout engine, and markup-driven tree building
//! for Trellis.
//!
//! Elements implement the [`Element`] contract (arrange, render, mouse
//! and focus state) on top of the reflection layer, so every element is
//! also a bindable object. Containers lay children end-to-end on a
//! stacking axis; grids negotiate column widths across sibling rows;
//! arrangement is memoized on the assigned rect.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`element`] | `Element`, `ElementBase`, `ElementRef` |
//! | [`layout`] | stacking distribution, rect helpers |
//! | [`widgets`] | `Panel`, `Label`, `Stack`, `Grid`, `PageView` |
//! | [`render`] | `RenderSink`, `DrawList` |
//! | [`markup`] | `MarkupNode`, `{bind …}` references |
//! | [`builder`] | `TreeBuilder`, `ElementRegistry`, `BuiltTree` |
//! | [`error`] | `BuildError` |

pub mod builder;
pub mod element;
pub mod error;
pub mod layout;
pub mod markup;
pub mod render;
pub mod widgets;

pub use builder::{BindingHandle, BuiltTree, ElementRegistry, TreeBuilder};
pub use element::{Element, ElementBase, ElementRef, describe_base};
pub use error::BuildError;
pub use markup::{BindSpec, MarkupNode};
pub use render::{DrawCmd, DrawList, RenderSink};

/// Everything an application embedding the toolkit usually needs.
pub mod prelude {
    pub use trellis_core::coords::{Rect, Vec2};
    pub use trellis_core::paint::Color;
    pub use trellis_core::style::{Alignment, Margin, Orientation, Size, SizePair};
    pub use trellis_reflect::{
        BindRef, Bindable, Binding, BindingMode, ChangeFeed, Converter, Kind, LookupTable,
        MultiBinding, NumericCast, Reflected, TypeBuilder, TypeRegistry, Value, bind_ref,
    };

    pub use crate::builder::{BindingHandle, BuiltTree, ElementRegistry, TreeBuilder};
    pub use crate::element::{Element, ElementBase, ElementRef};
    pub use crate::error::BuildError;
    pub use crate::markup::{BindSpec, MarkupNode};
    pub use crate::render::{DrawCmd, DrawList, RenderSink};
    pub use crate::widgets::{Grid, Label, PageView, Panel, Stack};
}
