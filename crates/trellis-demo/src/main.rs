//! Trellis demo console: a small headless run through the full
//! pipeline. Registers a few model objects, builds an element tree from
//! in-code markup, wires bindings (including a lookup-table converter
//! and a multi-level `console.probe.celsius` path), arranges the tree
//! and dumps the resulting draw list after each model change.

use std::any::Any;
use std::rc::Rc;

use trellis_core::logging::{LoggingConfig, init_logging};
use trellis_ui::prelude::*;

// ── Models ────────────────────────────────────────────────────────────────

/// A temperature probe. The only state a probe carries is its reading.
#[derive(Default)]
struct Thermocouple {
    celsius: f32,
    feed: ChangeFeed,
}

impl Bindable for Thermocouple {
    fn type_name(&self) -> &'static str {
        "demo.Thermocouple"
    }
    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Reflected for Thermocouple {
    const TYPE_NAME: &'static str = "demo.Thermocouple";
    fn describe(b: &mut TypeBuilder<Self>) {
        b.field(
            "celsius",
            Kind::Float,
            |t| Value::Float(t.celsius),
            |t, v| {
                t.celsius = v.as_float()?;
                Ok(())
            },
        );
    }
}

/// A needle gauge driven from a probe through a calibration table.
#[derive(Default)]
struct Dial {
    angle: f32,
    feed: ChangeFeed,
}

impl Bindable for Dial {
    fn type_name(&self) -> &'static str {
        "demo.Dial"
    }
    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Reflected for Dial {
    const TYPE_NAME: &'static str = "demo.Dial";
    fn describe(b: &mut TypeBuilder<Self>) {
        b.field(
            "angle",
            Kind::Float,
            |d| Value::Float(d.angle),
            |d, v| {
                d.angle = v.as_float()?;
                Ok(())
            },
        );
    }
}

/// The console selects which probe is currently on watch. Bindings that
/// route through `console.probe` re-track when the selection changes.
#[derive(Default)]
struct Console {
    probe: Option<BindRef>,
    feed: ChangeFeed,
}

impl Bindable for Console {
    fn type_name(&self) -> &'static str {
        "demo.Console"
    }
    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Reflected for Console {
    const TYPE_NAME: &'static str = "demo.Console";
    fn describe(b: &mut TypeBuilder<Self>) {
        b.field(
            "probe",
            Kind::Object,
            |c| Value::Object(c.probe.clone()),
            |c, v| {
                c.probe = v.as_object()?;
                Ok(())
            },
        );
    }
}

// ── Markup ────────────────────────────────────────────────────────────────

fn console_markup() -> MarkupNode {
    MarkupNode::new("Stack")
        .attr("name", "shell")
        .attr("size", "*")
        .child(
            MarkupNode::new("Label")
                .attr("name", "title")
                .attr("size", "*,24")
                .attr("margin", "4")
                .attr("text", "TRELLIS THERMAL CONSOLE"),
        )
        .child(
            MarkupNode::new("Grid")
                .attr("name", "readouts")
                .attr("size", "*,48")
                .child(
                    MarkupNode::new("Stack")
                        .attr("orientation", "horizontal")
                        .child(MarkupNode::new("Label").attr("size", "96,*").attr("text", "cabin"))
                        .child(
                            MarkupNode::new("Label")
                                .attr("name", "cabin-readout")
                                .attr("size", "*,*")
                                .attr("text", "{bind cabin.celsius}"),
                        ),
                )
                .child(
                    MarkupNode::new("Stack")
                        .attr("orientation", "horizontal")
                        .child(MarkupNode::new("Label").attr("size", "64,*").attr("text", "watch"))
                        // Column one still lands at 96: the grid aligns
                        // it to the wider "cabin" row above.
                        .child(
                            MarkupNode::new("Label")
                                .attr("name", "watch-readout")
                                .attr("size", "*,*")
                                .attr("text", "{bind console.probe.celsius}"),
                        ),
                ),
        )
        .child(
            MarkupNode::new("Label")
                .attr("name", "dial-readout")
                .attr("size", "*,16")
                .attr("text", "{bind dial.angle}"),
        )
        .child(MarkupNode::new("Panel").attr("name", "backdrop").attr("size", "*").attr("color", "black"))
}

// ── Driver ────────────────────────────────────────────────────────────────

fn dump(tag: &str, tree: &BuiltTree, list: &mut DrawList) {
    // Model writes may have invalidated leaves under memoized parents;
    // re-arrange the whole tree before reading rects.
    tree.root.invalidate();
    tree.root.arrange(Rect::new(0.0, 0.0, 320.0, 240.0));
    list.clear();
    tree.root.render(list);

    println!();
    println!("  ── {tag} ──");
    for cmd in list.items() {
        match cmd {
            DrawCmd::Rect { rect, color } => {
                println!("  rect {:>5}x{:<5} at ({:>5},{:>5})  {color}", rect.size.x, rect.size.y, rect.origin.x, rect.origin.y);
            }
            DrawCmd::Text { rect, text, color, .. } => {
                println!("  text {:?} at ({:>5},{:>5})  {color}", text, rect.origin.x, rect.origin.y);
            }
        }
    }
}

fn run() -> anyhow::Result<()> {
    let mut types = TypeRegistry::new();
    let elements = ElementRegistry::with_builtins(&mut types)?;
    types.register::<Thermocouple>()?;
    types.register::<Dial>()?;
    types.register::<Console>()?;
    let types = Rc::new(types);

    let cabin = bind_ref(Thermocouple { celsius: 21.0, feed: ChangeFeed::new() });
    let core = bind_ref(Thermocouple { celsius: 640.0, feed: ChangeFeed::new() });
    let dial = bind_ref(Dial::default());
    let console = bind_ref(Console { probe: Some(Rc::clone(&cabin)), feed: ChangeFeed::new() });

    // Calibration keyed (angle, celsius): the converter's key axis sits
    // on the dial side, so the reading drives the reverse leg and is
    // interpolated over the celsius values.
    let gauge_curve = LookupTable::new([(-90.0, 0.0), (0.0, 25.0), (90.0, 50.0)])?;
    let _needle = Binding::new(
        types.property_of(&dial, "angle")?,
        types.property_of(&cabin, "celsius")?,
        BindingMode::OneWay,
        Some(Rc::new(gauge_curve)),
    )?;

    let tree = TreeBuilder::new(Rc::clone(&types), elements)
        .model("cabin", Rc::clone(&cabin))
        .model("console", Rc::clone(&console))
        .model("dial", Rc::clone(&dial))
        .build_or_fallback(&console_markup());
    log::info!("tree built; {} markup bindings live", tree.bindings.len());

    let mut list = DrawList::new();
    dump("initial", &tree, &mut list);

    // Cabin warms up; the readout and the calibrated dial both follow.
    types.property_of(&cabin, "celsius")?.set(Value::Float(37.5))?;
    dump("cabin at 37.5", &tree, &mut list);

    // Put the core probe on watch; the multi-level binding re-tracks.
    types
        .property_of(&console, "probe")?
        .set(Value::Object(Some(Rc::clone(&core))))?;
    dump("watching core", &tree, &mut list);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║        TRELLIS THERMAL CONSOLE         ║");
    println!("  ║   reflection bindings · stack layout   ║");
    println!("  ╚════════════════════════════════════════╝");

    run()
}
