use std::any::Any;

use trellis_core::coords::{Rect, Vec2};
use trellis_reflect::{Bindable, ChangeFeed, Kind, Reflected, TypeBuilder, Value};

use crate::element::{Element, ElementBase, ElementRef, describe_base};
use crate::render::RenderSink;

/// A page switcher: holds several children, shows exactly one.
///
/// Unlike the spatial containers, pointer events go to the active page
/// unconditionally — geometry is ignored, the active page owns the
/// cursor.
#[derive(Default)]
pub struct PageView {
    base: ElementBase,
    children: Vec<ElementRef>,
    /// Name of the active page; empty selects the first child.
    page: String,
}

impl PageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::named(name),
            ..Self::default()
        }
    }

    pub fn add_page(&mut self, child: ElementRef) {
        self.children.push(child);
        self.base.invalidate();
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Switch the active page by name. Focus follows the switch.
    pub fn set_page(&mut self, name: impl Into<String>) {
        self.page = name.into();
        self.base.invalidate();
        let active = self.active_child();
        for child in &self.children {
            match &active {
                Some(active) if ElementRef::ptr_eq(active, child) => {
                    child.borrow_mut().base_mut().focused = true;
                }
                _ => child.blur(),
            }
        }
    }

    fn active_child(&self) -> Option<ElementRef> {
        self.children
            .iter()
            .find(|child| child.name() == self.page)
            .or_else(|| self.children.first())
            .cloned()
    }
}

impl Bindable for PageView {
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

impl Reflected for PageView {
    const TYPE_NAME: &'static str = "PageView";

    fn describe(b: &mut TypeBuilder<Self>) {
        describe_base(b);
        b.field(
            "page",
            Kind::Str,
            |p| Value::Str(p.page.clone()),
            |p, v| {
                p.set_page(v.as_str()?);
                Ok(())
            },
        );
        b.constructor(PageView::new);
    }
}

impl Element for PageView {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn intrinsic_size(&self) -> Vec2 {
        self.children
            .iter()
            .map(|child| child.borrow().intrinsic_size())
            .fold(Vec2::zero(), Vec2::max)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        if let Some(active) = self.active_child() {
            active.render(sink);
        }
    }

    fn place_children(&mut self, rect: Rect) {
        // Only the visible page is laid out; the rest keep stale caches
        // and re-place when switched in.
        if let Some(active) = self.active_child() {
            active.invalidate();
            active.assign(rect);
        }
    }

    fn children(&self) -> Vec<ElementRef> {
        self.children.clone()
    }

    fn adopt(&mut self, child: ElementRef) -> bool {
        self.add_page(child);
        true
    }

    fn pointer_moved(&mut self, pos: Vec2) {
        self.base.hovered = self.base.rect().contains(pos);
        if let Some(active) = self.active_child() {
            active.borrow_mut().base_mut().focused = true;
            active.pointer_moved(pos);
        }
    }
}
