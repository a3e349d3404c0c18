use std::any::Any;

use trellis_core::coords::Vec2;
use trellis_core::paint::Color;
use trellis_core::style::SizePair;
use trellis_reflect::{Bindable, ChangeFeed, Kind, Reflected, TypeBuilder, Value};

use crate::element::{Element, ElementBase, describe_base};
use crate::render::RenderSink;

/// A colored rectangle — the simplest leaf element.
#[derive(Default)]
pub struct Panel {
    base: ElementBase,
    color: Color,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: ElementBase::named(name),
            color: Color::default(),
        }
    }

    pub fn sized(w: f32, h: f32) -> Self {
        let mut panel = Self::new();
        panel.base.size = SizePair::px(w, h);
        panel
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Bindable for Panel {
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

impl Reflected for Panel {
    const TYPE_NAME: &'static str = "Panel";

    fn describe(b: &mut TypeBuilder<Self>) {
        describe_base(b);
        b.field(
            "color",
            Kind::Color,
            |p| Value::Color(p.color),
            |p, v| {
                p.color = v.as_color()?;
                Ok(())
            },
        );
        b.constructor(Panel::new);
    }
}

impl Element for Panel {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn intrinsic_size(&self) -> Vec2 {
        Vec2::zero()
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        let rect = self.base.rect();
        if !rect.is_empty() {
            sink.fill_rect(rect, self.color);
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
    fn renders_its_arranged_rect() {
        let panel = ElementRef::new(Panel::sized(30.0, 10.0).with_color(Color::RED));
        panel.arrange(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut list = DrawList::new();
        panel.render(&mut list);
        assert_eq!(
            list.items(),
            &[DrawCmd::Rect { rect: Rect::new(0.0, 0.0, 30.0, 10.0), color: Color::RED }]
        );
    }

    #[test]
    fn unarranged_panel_draws_nothing() {
        let panel = ElementRef::new(Panel::new().with_color(Color::RED));
        let mut list = DrawList::new();
        panel.render(&mut list);
        assert!(list.is_empty());
    }
}
