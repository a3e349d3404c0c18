use trellis_core::coords::Rect;
use trellis_core::paint::Color;
use trellis_core::style::Alignment;

// ── RenderSink ────────────────────────────────────────────────────────────

/// Draw-call sink the element tree renders into.
///
/// The real renderer lives outside this crate; elements only ever emit
/// resolved rectangles plus their paint data. [`DrawList`] is the
/// in-process implementation used by tests and tools.
pub trait RenderSink {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, rect: Rect, text: &str, color: Color, align: Alignment);
}

// ── DrawList ──────────────────────────────────────────────────────────────

/// Renderer-agnostic draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: Color,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        align: Alignment,
    },
}

/// Recorded draw stream for one frame, in paint order.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items, keeping allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in insertion (= paint) order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl RenderSink for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.items.push(DrawCmd::Rect { rect, color });
    }

    fn draw_text(&mut self, rect: Rect, text: &str, color: Color, align: Alignment) {
        self.items.push(DrawCmd::Text {
            rect,
            text: text.to_owned(),
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_paint_order() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        list.draw_text(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            "hi",
            Color::WHITE,
            Alignment::Center,
        );
        assert_eq!(list.items().len(), 2);
        assert!(matches!(list.items()[0], DrawCmd::Rect { .. }));
        assert!(matches!(list.items()[1], DrawCmd::Text { .. }));
        list.clear();
        assert!(list.is_empty());
    }
}
