//! Concrete visual elements: leaves ([`Panel`], [`Label`]) and the
//! stacking containers ([`Stack`], [`Grid`], [`PageView`]).

mod grid;
mod label;
mod page;
mod panel;
mod stack;

pub use grid::Grid;
pub use label::Label;
pub use page::PageView;
pub use panel::Panel;
pub use stack::Stack;
