use std::any::Any;

use trellis_core::coords::{Rect, Vec2};
use trellis_core::style::Orientation;
use trellis_reflect::{Bindable, ChangeFeed, Kind, Reflected, TypeBuilder, Value};

use crate::element::{Element, ElementBase, ElementRef, describe_base, route_spatial};
use crate::layout::{SlotSpec, stack_sizes};
use crate::render::RenderSink;

/// A container laying children end-to-end along one axis.
///
/// Fixed children (pixel or auto sizes) take their declared extent;
/// greedy children (`*`, `N%`) split the leftover proportionally. The
/// cross-axis extent of each child passes through from its own declared
/// size.
#[derive(Default)]
pub struct Stack {
    base: ElementBase,
    orientation: Orientation,
    children: Vec<ElementRef>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::named(name),
            ..Self::default()
        }
    }

    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.base.invalidate();
    }

    pub fn add_child(&mut self, child: ElementRef) {
        self.children.push(child);
        self.base.invalidate();
    }

    pub fn with_child(mut self, child: ElementRef) -> Self {
        self.add_child(child);
        self
    }

    #[inline]
    fn stacks_horizontally(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    fn axis_of(&self, v: Vec2) -> f32 {
        if self.stacks_horizontally() { v.x } else { v.y }
    }

    fn cross_of(&self, v: Vec2) -> f32 {
        if self.stacks_horizontally() { v.y } else { v.x }
    }

    /// Each child's stacking-axis inputs, outer margins included.
    fn slot_specs(&self) -> Vec<SlotSpec> {
        let horizontal = self.stacks_horizontally();
        self.children
            .iter()
            .map(|child| {
                let e = child.borrow();
                let base = e.base();
                SlotSpec {
                    size: base.size.axis(horizontal),
                    intrinsic: self.axis_of(e.intrinsic_size()),
                    margin: if horizontal { base.margin.h() } else { base.margin.v() },
                }
            })
            .collect()
    }

    /// Outer cross-axis extent for one child inside a rect `cross` wide.
    fn cross_extent(&self, child: &ElementRef, cross: f32) -> f32 {
        let e = child.borrow();
        let base = e.base();
        let horizontal = self.stacks_horizontally();
        let margin = if horizontal { base.margin.v() } else { base.margin.h() };
        let avail = (cross - margin).max(0.0);
        let declared = base.size.axis(!horizontal);
        let intrinsic = self.cross_of(e.intrinsic_size());
        declared.resolve(avail, intrinsic).clamp(0.0, avail) + margin
    }
}

impl Bindable for Stack {
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

impl Reflected for Stack {
    const TYPE_NAME: &'static str = "Stack";

    fn describe(b: &mut TypeBuilder<Self>) {
        describe_base(b);
        b.field(
            "orientation",
            Kind::Orientation,
            |s| Value::Orientation(s.orientation),
            |s, v| {
                s.set_orientation(v.as_orientation()?);
                Ok(())
            },
        );
        b.constructor(Stack::new);
    }
}

impl Element for Stack {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    /// Sum of fixed extents on the stacking axis, max of resolved cross
    /// extents on the other. Greedy children have no intrinsic claim.
    fn intrinsic_size(&self) -> Vec2 {
        let mut along = 0.0f32;
        let mut cross = 0.0f32;
        let horizontal = self.stacks_horizontally();
        for child in &self.children {
            let e = child.borrow();
            let base = e.base();
            let declared = base.size.axis(horizontal);
            if !declared.is_greedy() {
                let axis_margin = if horizontal { base.margin.h() } else { base.margin.v() };
                along += declared.resolve(0.0, self.axis_of(e.intrinsic_size())) + axis_margin;
            }
            let cross_margin = if horizontal { base.margin.v() } else { base.margin.h() };
            let declared_cross = base.size.axis(!horizontal);
            let c = declared_cross.resolve(0.0, self.cross_of(e.intrinsic_size())) + cross_margin;
            cross = cross.max(c);
        }
        if horizontal {
            Vec2::new(along, cross)
        } else {
            Vec2::new(cross, along)
        }
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        for child in &self.children {
            child.render(sink);
        }
    }

    fn place_children(&mut self, rect: Rect) {
        let extents = stack_sizes(&self.slot_specs(), self.axis_of(rect.size));
        self.place_with(rect, &extents);
    }

    fn children(&self) -> Vec<ElementRef> {
        self.children.clone()
    }

    fn adopt(&mut self, child: ElementRef) -> bool {
        self.add_child(child);
        true
    }

    fn lane_extents(&self, total: f32) -> Vec<f32> {
        stack_sizes(&self.slot_specs(), total)
    }

    fn place_with(&mut self, rect: Rect, extents: &[f32]) {
        let horizontal = self.stacks_horizontally();
        let cross = self.cross_of(rect.size);
        let mut cursor = self.axis_of(rect.origin);
        for (child, &extent) in self.children.iter().zip(extents) {
            let cross_extent = self.cross_extent(child, cross);
            let slot = if horizontal {
                Rect::new(cursor, rect.origin.y, extent, cross_extent)
            } else {
                Rect::new(rect.origin.x, cursor, cross_extent, extent)
            };
            child.assign(slot);
            cursor += extent;
        }
    }

    fn pointer_moved(&mut self, pos: Vec2) {
        self.base.hovered = self.base.rect().contains(pos);
        route_spatial(&self.children, pos);
    }
}
