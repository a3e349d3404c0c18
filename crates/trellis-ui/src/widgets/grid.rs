use std::any::Any;

use trellis_core::coords::{Rect, Vec2};
use trellis_reflect::{Bindable, ChangeFeed, Reflected, TypeBuilder};

use crate::element::{Element, ElementBase, ElementRef, describe_base, route_spatial};
use crate::layout::{SlotSpec, inset, stack_sizes};
use crate::render::RenderSink;

/// A vertical stack of rows whose columns align.
///
/// Each row is a horizontal stacking container. The grid first asks every
/// row what extents it would give its own children, then overrides each
/// column with the maximum extent that column takes in any row. Rows
/// shorter than the widest row simply stop early — the missing columns
/// act as zero-width padding.
#[derive(Default)]
pub struct Grid {
    base: ElementBase,
    rows: Vec<ElementRef>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::named(name),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: ElementRef) {
        self.rows.push(row);
        self.base.invalidate();
    }

    /// Widest column extents across all rows.
    fn negotiate_columns(&self, width: f32) -> Vec<f32> {
        let mut columns: Vec<f32> = Vec::new();
        for row in &self.rows {
            let lanes = row.borrow().lane_extents(width);
            for (index, extent) in lanes.into_iter().enumerate() {
                if index == columns.len() {
                    columns.push(extent);
                } else {
                    columns[index] = columns[index].max(extent);
                }
            }
        }
        columns
    }

    fn row_specs(&self) -> Vec<SlotSpec> {
        self.rows
            .iter()
            .map(|row| {
                let e = row.borrow();
                let base = e.base();
                SlotSpec {
                    size: base.size.y,
                    intrinsic: e.intrinsic_size().y,
                    margin: base.margin.v(),
                }
            })
            .collect()
    }
}

impl Bindable for Grid {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
    fn feed(&self) -> &ChangeFeed {
        self.base.feed()
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Reflected for Grid {
    const TYPE_NAME: &'static str = "Grid";

    fn describe(b: &mut TypeBuilder<Self>) {
        describe_base(b);
        b.constructor(Grid::new);
    }
}

impl Element for Grid {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn intrinsic_size(&self) -> Vec2 {
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for row in &self.rows {
            let e = row.borrow();
            let intrinsic = e.intrinsic_size();
            width = width.max(intrinsic.x + e.base().margin.h());
            height += e.base().size.y.resolve(0.0, intrinsic.y) + e.base().margin.v();
        }
        Vec2::new(width, height)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        for row in &self.rows {
            row.render(sink);
        }
    }

    fn place_children(&mut self, rect: Rect) {
        let heights = stack_sizes(&self.row_specs(), rect.size.y);
        let columns = self.negotiate_columns(rect.size.x);
        let mut cursor = rect.origin.y;
        for (row, &height) in self.rows.iter().zip(&heights) {
            let slot = Rect::new(rect.origin.x, cursor, rect.size.x, height);
            // Rows are always re-placed when the grid recomputes: a rect
            // match on the row alone cannot see column changes caused by
            // its siblings.
            let mut r = row.borrow_mut();
            let own = inset(slot, r.base().margin);
            r.base().store(slot, own);
            let lanes = r.children().len().min(columns.len());
            r.place_with(own, &columns[..lanes]);
            cursor += height;
        }
    }

    fn children(&self) -> Vec<ElementRef> {
        self.rows.clone()
    }

    fn adopt(&mut self, child: ElementRef) -> bool {
        self.add_row(child);
        true
    }

    fn pointer_moved(&mut self, pos: Vec2) {
        self.base.hovered = self.base.rect().contains(pos);
        route_spatial(&self.rows, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::style::{Size, SizePair};
    use crate::widgets::{Panel, Stack};

    fn cell(width: f32) -> ElementRef {
        let mut p = Panel::new();
        p.base_mut().size = SizePair::new(Size::Px(width), Size::Star);
        ElementRef::new(p)
    }

    fn row(height: f32, cells: Vec<ElementRef>) -> ElementRef {
        let mut s = Stack::horizontal();
        s.base_mut().size = SizePair::new(Size::Star, Size::Px(height));
        for c in cells {
            s.add_child(c);
        }
        ElementRef::new(s)
    }

    #[test]
    fn columns_align_to_the_widest_row() {
        let a0 = cell(10.0);
        let a1 = cell(20.0);
        let b0 = cell(15.0);
        let b1 = cell(5.0);

        let mut grid = Grid::new();
        grid.base_mut().size = SizePair::new(Size::Star, Size::Star);
        grid.add_row(row(20.0, vec![a0.clone(), a1.clone()]));
        grid.add_row(row(20.0, vec![b0.clone(), b1.clone()]));
        let grid = ElementRef::new(grid);

        grid.arrange(Rect::new(0.0, 0.0, 100.0, 40.0));
        // Column 0 is max(10, 15), column 1 is max(20, 5) — in every row.
        assert_eq!(a0.rect().size.x, 15.0);
        assert_eq!(b0.rect().size.x, 15.0);
        assert_eq!(a1.rect().size.x, 20.0);
        assert_eq!(b1.rect().size.x, 20.0);
        // Column 1 starts where the aligned column 0 ends.
        assert_eq!(a1.rect().origin.x, 15.0);
        assert_eq!(b1.rect().origin.x, 15.0);
    }

    #[test]
    fn short_rows_pad_with_zero_width_columns() {
        let a0 = cell(10.0);
        let b0 = cell(30.0);
        let b1 = cell(25.0);

        let mut grid = Grid::new();
        grid.base_mut().size = SizePair::new(Size::Star, Size::Star);
        grid.add_row(row(10.0, vec![a0.clone()]));
        grid.add_row(row(10.0, vec![b0.clone(), b1.clone()]));
        let grid = ElementRef::new(grid);

        grid.arrange(Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(a0.rect().size.x, 30.0);
        assert_eq!(b0.rect().size.x, 30.0);
        assert_eq!(b1.rect().size.x, 25.0);
    }

    #[test]
    fn rows_stack_vertically() {
        let top = row(12.0, vec![cell(10.0)]);
        let bottom = row(18.0, vec![cell(10.0)]);
        let mut grid = Grid::new();
        grid.base_mut().size = SizePair::new(Size::Star, Size::Star);
        grid.add_row(top.clone());
        grid.add_row(bottom.clone());
        let grid = ElementRef::new(grid);

        grid.arrange(Rect::new(0.0, 0.0, 50.0, 40.0));
        assert_eq!(top.rect(), Rect::new(0.0, 0.0, 50.0, 12.0));
        assert_eq!(bottom.rect(), Rect::new(0.0, 12.0, 50.0, 18.0));
    }
}
