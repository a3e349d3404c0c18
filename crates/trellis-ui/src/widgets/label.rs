use std::any::Any;

use trellis_core::coords::Vec2;
use trellis_core::paint::Color;
use trellis_core::style::Alignment;
use trellis_reflect::{Bindable, ChangeFeed, Kind, Reflected, TypeBuilder, Value};

use crate::element::{Element, ElementBase, describe_base};
use crate::render::RenderSink;

// Placeholder monospace metrics; real shaping lives in the renderer.
const GLYPH_ADVANCE: f32 = 8.0;
const LINE_HEIGHT: f32 = 16.0;

/// A single line of text.
pub struct Label {
    base: ElementBase,
    text: String,
    color: Color,
    alignment: Alignment,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::default(),
            text: text.into(),
            color: Color::WHITE,
            alignment: Alignment::default(),
        }
    }

    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            base: ElementBase::named(name),
            ..Self::new(text)
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        // Intrinsic size follows the text.
        self.base.invalidate();
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Bindable for Label {
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

impl Reflected for Label {
    const TYPE_NAME: &'static str = "Label";

    fn describe(b: &mut TypeBuilder<Self>) {
        describe_base(b);
        b.field(
            "text",
            Kind::Str,
            |l| Value::Str(l.text.clone()),
            |l, v| {
                l.set_text(v.as_str()?);
                Ok(())
            },
        );
        b.field(
            "color",
            Kind::Color,
            |l| Value::Color(l.color),
            |l, v| {
                l.color = v.as_color()?;
                Ok(())
            },
        );
        b.field(
            "alignment",
            Kind::Alignment,
            |l| Value::Alignment(l.alignment),
            |l, v| {
                l.alignment = v.as_alignment()?;
                Ok(())
            },
        );
        b.constructor(Label::default);
    }
}

impl Element for Label {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn intrinsic_size(&self) -> Vec2 {
        Vec2::new(self.text.chars().count() as f32 * GLYPH_ADVANCE, LINE_HEIGHT)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        let rect = self.base.rect();
        if !rect.is_empty() {
            sink.draw_text(rect, &self.text, self.color, self.alignment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::coords::Rect;
    use crate::element::ElementRef;
    use crate::render::{DrawCmd, DrawList};

    #[test]
    fn intrinsic_size_follows_text() {
        let label = Label::new("abcd");
        assert_eq!(label.intrinsic_size(), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn auto_sized_label_arranges_to_intrinsic() {
        let label = ElementRef::new(Label::new("abcd"));
        let own = label.arrange(Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(own.size, Vec2::new(32.0, 16.0));
    }

    #[test]
    fn set_text_invalidates_arrangement() {
        let label = ElementRef::new(Label::new("ab"));
        let parent = Rect::new(0.0, 0.0, 200.0, 200.0);
        assert_eq!(label.arrange(parent).size.x, 16.0);
        {
            let mut l = label.borrow_mut();
            l.as_any_mut().downcast_mut::<Label>().unwrap().set_text("abcdef");
        }
        assert_eq!(label.arrange(parent).size.x, 48.0);
    }

    #[test]
    fn renders_text_command() {
        let label = ElementRef::new(Label::new("hi").with_color(Color::YELLOW));
        label.arrange(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut list = DrawList::new();
        label.render(&mut list);
        assert_eq!(
            list.items(),
            &[DrawCmd::Text {
                rect: Rect::new(0.0, 0.0, 16.0, 16.0),
                text: "hi".into(),
                color: Color::YELLOW,
                align: Alignment::Center,
            }]
        );
    }
}
