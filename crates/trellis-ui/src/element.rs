use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use trellis_core::coords::{Rect, Vec2};
use trellis_core::style::{Margin, Size, SizePair};
use trellis_reflect::{BindRef, Bindable, ChangeFeed, Kind, TypeBuilder, Value};

use crate::layout::inset;
use crate::render::RenderSink;

// ── ElementBase ───────────────────────────────────────────────────────────

/// Per-element state every visual element composes in: identity, declared
/// geometry, focus flags, the change feed, and the arrangement cache.
///
/// Keeping this a plain struct (instead of a base class hierarchy) lets
/// each concrete element pick the behaviors it layers on top.
#[derive(Default)]
pub struct ElementBase {
    /// Stable name used for tree lookup and binding targets.
    pub name: String,
    /// Declared size per axis (`N`, `N%`, `*`, `auto`).
    pub size: SizePair,
    /// Declared offset from the parent origin (`N` pixels or `N%`).
    pub offset: SizePair,
    pub margin: Margin,
    pub focused: bool,
    pub hovered: bool,
    /// Last `(assigned input, resolved own)` rect pair. Arrangement
    /// recomputes only when the input differs or after `invalidate`.
    arranged: Cell<Option<(Rect, Rect)>>,
    feed: ChangeFeed,
}

fn resolve_offset(size: Size, parent: f32) -> f32 {
    match size {
        Size::Px(v) => v,
        Size::Percent(p) => parent * p / 100.0,
        Size::Star | Size::Auto => 0.0,
    }
}

impl ElementBase {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// The resolved rect from the last arrangement; zero before any.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.arranged.get().map(|(_, own)| own).unwrap_or_default()
    }

    /// Drop the arrangement cache so the next arrange recomputes even for
    /// an identical input rect.
    #[inline]
    pub fn invalidate(&self) {
        self.arranged.set(None);
    }

    #[inline]
    pub(crate) fn cached_for(&self, input: Rect) -> Option<Rect> {
        match self.arranged.get() {
            Some((seen, own)) if seen == input => Some(own),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn store(&self, input: Rect, own: Rect) {
        self.arranged.set(Some((input, own)));
    }

    /// Resolve a rect against a full parent rect: origin shifted by the
    /// declared offset and margin, size resolved per axis against the
    /// space left after margins and clamped to it.
    pub fn resolve_rect(&self, parent: Rect, intrinsic: Vec2) -> Rect {
        let avail = Vec2::new(
            (parent.size.x - self.margin.h()).max(0.0),
            (parent.size.y - self.margin.v()).max(0.0),
        );
        let size = Vec2::new(
            self.size.x.resolve(avail.x, intrinsic.x).clamp(0.0, avail.x),
            self.size.y.resolve(avail.y, intrinsic.y).clamp(0.0, avail.y),
        );
        let origin = parent.origin
            + Vec2::new(
                resolve_offset(self.offset.x, parent.size.x) + self.margin.left,
                resolve_offset(self.offset.y, parent.size.y) + self.margin.top,
            );
        Rect::from_origin_size(origin, size)
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// The visual-element contract layout, rendering, and binding act on.
///
/// Arrangement is memoized on the input rect: `arrange`/`assign` return
/// the cached result for an unchanged input without re-laying children,
/// which also makes them idempotent — hit-testing and rendering can both
/// call them in the same frame.
pub trait Element: Bindable {
    fn base(&self) -> &ElementBase;
    fn base_mut(&mut self) -> &mut ElementBase;

    /// Natural content-driven size, used when the declared size is `auto`.
    fn intrinsic_size(&self) -> Vec2;

    /// Emit draw calls for the last-arranged rect.
    fn render(&self, sink: &mut dyn RenderSink);

    /// Lay out children inside the resolved own rect. Leaves do nothing.
    fn place_children(&mut self, _rect: Rect) {}

    /// Child handles in layout order. Leaves have none.
    fn children(&self) -> Vec<ElementRef> {
        Vec::new()
    }

    /// Whether this element accepts `child`; containers push and answer
    /// true, leaves refuse.
    fn adopt(&mut self, _child: ElementRef) -> bool {
        false
    }

    /// The stacking-axis extents this container would hand its children
    /// in `total` space. Used by grids to negotiate column widths across
    /// sibling rows. Leaves answer empty.
    fn lane_extents(&self, _total: f32) -> Vec<f32> {
        Vec::new()
    }

    /// Lay out children with externally imposed stacking extents
    /// (the grid's aligned column widths). Leaves do nothing.
    fn place_with(&mut self, _rect: Rect, _extents: &[f32]) {}

    /// Pointer-position update. The default marks hover by containment;
    /// containers override to route to the child under the cursor.
    fn pointer_moved(&mut self, pos: Vec2) {
        let inside = self.base().rect().contains(pos);
        self.base_mut().hovered = inside;
    }

    /// Resolve this element against a full parent rect (declared offset,
    /// size, and margin all apply). Memoized on `parent`.
    fn arrange(&mut self, parent: Rect) -> Rect {
        if let Some(own) = self.base().cached_for(parent) {
            return own;
        }
        let own = self.base().resolve_rect(parent, self.intrinsic_size());
        self.base_mut().store(parent, own);
        self.place_children(own);
        own
    }

    /// Take an exact slot handed down by a stacking parent: only the
    /// margin applies, the parent already resolved the extent. Memoized
    /// on `slot`.
    fn assign(&mut self, slot: Rect) -> Rect {
        if let Some(own) = self.base().cached_for(slot) {
            return own;
        }
        let own = inset(slot, self.base().margin);
        self.base_mut().store(slot, own);
        self.place_children(own);
        own
    }
}

// ── ElementRef ────────────────────────────────────────────────────────────

/// Shared handle to an element, paired with the bindable view of the same
/// allocation so the reflection layer can reach its properties.
#[derive(Clone)]
pub struct ElementRef {
    element: Rc<RefCell<dyn Element>>,
    object: BindRef,
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self.element.borrow();
        f.debug_struct("ElementRef")
            .field("type", &element.type_name())
            .field("name", &element.base().name)
            .finish()
    }
}

impl ElementRef {
    pub fn new<E: Element>(element: E) -> Self {
        Self::from_rc(Rc::new(RefCell::new(element)))
    }

    /// Wrap an existing concrete handle; both views share the allocation.
    pub fn from_rc<E: Element>(rc: Rc<RefCell<E>>) -> Self {
        // `Rc::clone(&rc)` would demand an already erased argument;
        // clone first, then unsize at the annotation.
        let object: BindRef = rc.clone();
        Self { element: rc, object }
    }

    /// The bindable view, for `TypeRegistry::property_of` and friends.
    #[inline]
    pub fn object(&self) -> &BindRef {
        &self.object
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, dyn Element> {
        self.element.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, dyn Element> {
        self.element.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(a: &ElementRef, b: &ElementRef) -> bool {
        Rc::ptr_eq(&a.element, &b.element)
    }

    pub fn arrange(&self, parent: Rect) -> Rect {
        self.element.borrow_mut().arrange(parent)
    }

    pub fn assign(&self, slot: Rect) -> Rect {
        self.element.borrow_mut().assign(slot)
    }

    pub fn rect(&self) -> Rect {
        self.element.borrow().base().rect()
    }

    /// Drop the arrangement caches of this element and its whole subtree.
    /// Elements carry no parent links, so a child that changed under a
    /// memoized container is picked up by invalidating from an ancestor
    /// and re-arranging.
    pub fn invalidate(&self) {
        self.element.borrow().base().invalidate();
        for child in self.element.borrow().children() {
            child.invalidate();
        }
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        self.element.borrow().render(sink);
    }

    pub fn pointer_moved(&self, pos: Vec2) {
        self.element.borrow_mut().pointer_moved(pos);
    }

    pub fn name(&self) -> String {
        self.element.borrow().base().name.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.element.borrow().base().focused
    }

    pub fn is_hovered(&self) -> bool {
        self.element.borrow().base().hovered
    }

    /// Depth-first lookup by stable name, this element included.
    pub fn find(&self, name: &str) -> Option<ElementRef> {
        if self.element.borrow().base().name == name {
            return Some(self.clone());
        }
        let children = self.element.borrow().children();
        children.iter().find_map(|child| child.find(name))
    }

    /// Clear focus and hover on this element and its whole subtree.
    pub fn blur(&self) {
        {
            let mut element = self.element.borrow_mut();
            let base = element.base_mut();
            base.focused = false;
            base.hovered = false;
        }
        for child in self.element.borrow().children() {
            child.blur();
        }
    }
}

/// Spatial pointer routing shared by the stacking containers: the first
/// child whose cached rect contains the cursor gains focus and receives
/// the event; every other child's subtree is blurred.
pub(crate) fn route_spatial(children: &[ElementRef], pos: Vec2) {
    let hit = children.iter().find(|child| child.rect().contains(pos)).cloned();
    for child in children {
        match &hit {
            Some(hit) if ElementRef::ptr_eq(hit, child) => {
                child.borrow_mut().base_mut().focused = true;
                child.pointer_moved(pos);
            }
            _ => child.blur(),
        }
    }
}

// ── reflection helpers ────────────────────────────────────────────────────

/// Register the properties every element shares. Geometry setters drop
/// the arrangement cache so the next arrange picks the new values up.
pub fn describe_base<T: Element>(b: &mut TypeBuilder<T>) {
    b.field(
        "name",
        Kind::Str,
        |e| Value::Str(e.base().name.clone()),
        |e, v| {
            e.base_mut().name = v.as_str()?.to_owned();
            Ok(())
        },
    );
    b.field(
        "size",
        Kind::SizePair,
        |e| Value::SizePair(e.base().size),
        |e, v| {
            e.base_mut().size = v.as_size_pair()?;
            e.base().invalidate();
            Ok(())
        },
    );
    b.field(
        "offset",
        Kind::SizePair,
        |e| Value::SizePair(e.base().offset),
        |e, v| {
            e.base_mut().offset = v.as_size_pair()?;
            e.base().invalidate();
            Ok(())
        },
    );
    b.field(
        "margin",
        Kind::Margin,
        |e| Value::Margin(e.base().margin),
        |e, v| {
            e.base_mut().margin = v.as_margin()?;
            e.base().invalidate();
            Ok(())
        },
    );
    b.field(
        "focused",
        Kind::Bool,
        |e| Value::Bool(e.base().focused),
        |e, v| {
            e.base_mut().focused = v.as_bool()?;
            Ok(())
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Panel;

    // ── resolve_rect ──────────────────────────────────────────────────────

    #[test]
    fn resolves_pixels_and_percent() {
        let mut base = ElementBase::default();
        base.size = SizePair::new(Size::Px(50.0), Size::Percent(25.0));
        let own = base.resolve_rect(Rect::new(10.0, 10.0, 200.0, 100.0), Vec2::zero());
        assert_eq!(own, Rect::new(10.0, 10.0, 50.0, 25.0));
    }

    #[test]
    fn auto_uses_intrinsic() {
        let base = ElementBase::default(); // size defaults to auto,auto
        let own = base.resolve_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Vec2::new(33.0, 7.0));
        assert_eq!(own.size, Vec2::new(33.0, 7.0));
    }

    #[test]
    fn margin_shifts_and_shrinks() {
        let mut base = ElementBase::default();
        base.size = SizePair::new(Size::Star, Size::Star);
        base.margin = Margin::all(10.0);
        let own = base.resolve_rect(Rect::new(0.0, 0.0, 100.0, 60.0), Vec2::zero());
        assert_eq!(own, Rect::new(10.0, 10.0, 80.0, 40.0));
    }

    #[test]
    fn size_clamps_to_remaining_space() {
        let mut base = ElementBase::default();
        base.size = SizePair::px(500.0, 500.0);
        let own = base.resolve_rect(Rect::new(0.0, 0.0, 100.0, 100.0), Vec2::zero());
        assert_eq!(own.size, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn percent_offset_resolves_against_parent() {
        let mut base = ElementBase::default();
        base.offset = SizePair::new(Size::Percent(50.0), Size::Px(5.0));
        base.size = SizePair::px(10.0, 10.0);
        let own = base.resolve_rect(Rect::new(0.0, 0.0, 200.0, 100.0), Vec2::zero());
        assert_eq!(own.origin, Vec2::new(100.0, 5.0));
    }

    // ── memoization ───────────────────────────────────────────────────────

    #[test]
    fn arrange_is_idempotent_and_memoized() {
        let panel = ElementRef::new(Panel::sized(40.0, 20.0));
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        let first = panel.arrange(parent);
        let second = panel.arrange(parent);
        assert_eq!(first, second);
        assert_eq!(first.size, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn arrange_recomputes_on_new_input() {
        let panel = ElementRef::new(Panel::sized(40.0, 20.0));
        panel.arrange(Rect::new(0.0, 0.0, 100.0, 100.0));
        let moved = panel.arrange(Rect::new(50.0, 0.0, 100.0, 100.0));
        assert_eq!(moved.origin, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn invalidate_forces_recompute() {
        let panel = ElementRef::new(Panel::sized(40.0, 20.0));
        let parent = Rect::new(0.0, 0.0, 100.0, 100.0);
        panel.arrange(parent);
        {
            let mut p = panel.borrow_mut();
            p.base_mut().size = SizePair::px(60.0, 20.0);
        }
        // Same input rect: cache still answers with the stale size…
        assert_eq!(panel.arrange(parent).size.x, 40.0);
        // …until invalidated.
        panel.invalidate();
        assert_eq!(panel.arrange(parent).size.x, 60.0);
    }

    // ── lookup / focus ────────────────────────────────────────────────────

    #[test]
    fn find_matches_self_and_none_for_missing() {
        let panel = ElementRef::new(Panel::named("splash"));
        assert!(panel.find("splash").is_some());
        assert!(panel.find("missing").is_none());
    }

    #[test]
    fn blur_clears_flags() {
        let panel = ElementRef::new(Panel::named("p"));
        {
            let mut p = panel.borrow_mut();
            p.base_mut().focused = true;
            p.base_mut().hovered = true;
        }
        panel.blur();
        assert!(!panel.is_focused());
        assert!(!panel.is_hovered());
    }
}
