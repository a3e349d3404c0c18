use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::binding::{Binding, BindingMode};
use crate::convert::{Converter, DualVar};
use crate::error::ReflectError;
use crate::property::{BindRef, Bindable, ChangeFeed, Property, bind_ref};
use crate::registry::{Reflected, TypeBuilder, TypeRegistry};
use crate::value::{Kind, Value};

// ── LinkProbe ─────────────────────────────────────────────────────────────

/// Bridge object behind every multi-level binding: it observes "does the
/// intermediate object currently exist" as a plain boolean property. The
/// interesting work happens in the converter feeding it, not here.
///
/// Pre-registered by `TypeRegistry::new`.
#[derive(Default)]
pub(crate) struct LinkProbe {
    linked: bool,
    feed: ChangeFeed,
}

impl Bindable for LinkProbe {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
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

impl Reflected for LinkProbe {
    const TYPE_NAME: &'static str = "trellis.LinkProbe";

    fn describe(b: &mut TypeBuilder<Self>) {
        b.field(
            "linked",
            Kind::Bool,
            |p| Value::Bool(p.linked),
            |p, v| {
                p.linked = v.as_bool()?;
                Ok(())
            },
        );
        b.constructor(LinkProbe::default);
    }
}

// ── Relay ─────────────────────────────────────────────────────────────────

// Held purely for its teardown-on-drop; neither payload is read back.
enum Nested {
    Leaf { _binding: Binding },
    Chain { _chain: MultiBinding },
}

/// Shared state of one path level: everything needed to (re)build the
/// nested binding whenever the intermediate object's identity changes.
struct Relay {
    registry: Rc<TypeRegistry>,
    a: Property,
    rest: Vec<String>,
    mode: BindingMode,
    converter: Option<Rc<dyn Converter>>,
    nested: RefCell<Option<Nested>>,
    construction_error: RefCell<Option<ReflectError>>,
}

impl Relay {
    /// Tear down the current nested binding and, if `target` is live,
    /// build a fresh one against it.
    fn relink(&self, target: Option<BindRef>) -> Result<(), ReflectError> {
        // Old binding first: its subscriptions on the previous
        // intermediate must be gone before the new one appears.
        self.nested.borrow_mut().take();
        let Some(obj) = target else {
            log::debug!("multi-level binding: intermediate gone, unlinked");
            return Ok(());
        };
        let nested = self.link_to(&obj).inspect_err(|err| {
            *self.construction_error.borrow_mut() = Some(err.clone());
        })?;
        *self.nested.borrow_mut() = Some(nested);
        Ok(())
    }

    fn link_to(&self, obj: &BindRef) -> Result<Nested, ReflectError> {
        if self.rest.len() == 1 {
            let b = self.registry.property_of(obj, &self.rest[0])?;
            let binding = Binding::new(self.a.clone(), b, self.mode, self.converter.clone())?;
            Ok(Nested::Leaf { _binding: binding })
        } else {
            let segments: Vec<&str> = self.rest.iter().map(String::as_str).collect();
            let chain = MultiBinding::new(
                &self.registry,
                self.a.clone(),
                obj,
                &segments,
                self.mode,
                self.converter.clone(),
            )?;
            Ok(Nested::Chain { _chain: chain })
        }
    }
}

/// Object→bool converter whose side effect — not its output — keeps the
/// nested binding in step with the intermediate object's identity.
struct RelayConverter {
    relay: Rc<Relay>,
}

impl Converter for RelayConverter {
    fn from_kind(&self) -> Kind {
        Kind::Object
    }

    fn to_kind(&self) -> Kind {
        Kind::Bool
    }

    fn apply(&self, state: &mut DualVar, forward: bool) -> Result<(), ReflectError> {
        if !forward {
            // The bridge binding is one-way; this leg is never driven.
            state.from = Value::Object(None);
            return Ok(());
        }
        let target = state.from.as_object()?;
        state.to = Value::Bool(target.is_some());
        self.relay.relink(target)
    }
}

// ── MultiBinding ──────────────────────────────────────────────────────────

/// A binding whose B side is reached through a dotted path
/// (`root.hop.….prop`) of object-typed properties.
///
/// The first segment must resolve to an object-kind property on `root`;
/// each time that intermediate object is swapped, the binding below it is
/// torn down and rebuilt against the new instance, so no notification
/// from the old instance ever arrives again.
pub struct MultiBinding {
    bridge: Binding,
    relay: Rc<Relay>,
    // The probe is weakly held by the bridge's A endpoint; this strong
    // handle is what keeps it alive.
    _probe: BindRef,
}

impl fmt::Debug for MultiBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiBinding")
            .field("a", &self.relay.a.name())
            .field("rest", &self.relay.rest)
            .field("linked", &self.is_linked())
            .finish()
    }
}

impl MultiBinding {
    pub fn new(
        registry: &Rc<TypeRegistry>,
        a: Property,
        root: &BindRef,
        path: &[&str],
        mode: BindingMode,
        converter: Option<Rc<dyn Converter>>,
    ) -> Result<MultiBinding, ReflectError> {
        if path.len() < 2 {
            return Err(ReflectError::BadPath(path.join(".")));
        }
        let hop = registry.property_of(root, path[0])?;
        if hop.kind() != Kind::Object {
            return Err(ReflectError::BadPath(format!(
                "{} is {}, not an object",
                path[0],
                hop.kind()
            )));
        }

        let probe = bind_ref(LinkProbe::default());
        let probe_linked = registry.property_of(&probe, "linked")?;
        let relay = Rc::new(Relay {
            registry: Rc::clone(registry),
            a,
            rest: path[1..].iter().map(|s| (*s).to_owned()).collect(),
            mode,
            converter,
            nested: RefCell::new(None),
            construction_error: RefCell::new(None),
        });

        // One-way bridge: the hop property drives the probe through the
        // relay converter; its initial sync links the current target.
        let bridge = Binding::new(
            probe_linked,
            hop,
            BindingMode::OneWay,
            Some(Rc::new(RelayConverter { relay: Rc::clone(&relay) })),
        )?;

        if let Some(err) = relay.construction_error.borrow_mut().take() {
            bridge.dispose();
            relay.nested.borrow_mut().take();
            return Err(err);
        }

        Ok(MultiBinding { bridge, relay, _probe: probe })
    }

    /// True while a nested binding to a live intermediate exists.
    pub fn is_linked(&self) -> bool {
        self.relay.nested.borrow().is_some()
    }

    /// Tear down the bridge and any live nested binding. Idempotent.
    pub fn dispose(&self) {
        self.bridge.dispose();
        self.relay.nested.borrow_mut().take();
    }
}

impl Drop for MultiBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Display {
        value: f32,
        feed: ChangeFeed,
    }

    impl Bindable for Display {
        fn type_name(&self) -> &'static str {
            "Display"
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

    impl Reflected for Display {
        const TYPE_NAME: &'static str = "Display";
        fn describe(b: &mut TypeBuilder<Self>) {
            b.field(
                "value",
                Kind::Float,
                |d| Value::Float(d.value),
                |d, v| {
                    d.value = v.as_float()?;
                    Ok(())
                },
            );
        }
    }

    #[derive(Default)]
    struct Sensor {
        reading: f32,
        feed: ChangeFeed,
    }

    impl Bindable for Sensor {
        fn type_name(&self) -> &'static str {
            "Sensor"
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

    impl Reflected for Sensor {
        const TYPE_NAME: &'static str = "Sensor";
        fn describe(b: &mut TypeBuilder<Self>) {
            b.field(
                "reading",
                Kind::Float,
                |s| Value::Float(s.reading),
                |s, v| {
                    s.reading = v.as_float()?;
                    Ok(())
                },
            );
        }
    }

    #[derive(Default)]
    struct Hub {
        active: Option<BindRef>,
        feed: ChangeFeed,
    }

    impl Bindable for Hub {
        fn type_name(&self) -> &'static str {
            "Hub"
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

    impl Reflected for Hub {
        const TYPE_NAME: &'static str = "Hub";
        fn describe(b: &mut TypeBuilder<Self>) {
            b.field(
                "active",
                Kind::Object,
                |h| Value::Object(h.active.clone()),
                |h, v| {
                    h.active = v.as_object()?;
                    Ok(())
                },
            );
        }
    }

    fn setup() -> Rc<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        registry.register::<Display>().unwrap();
        registry.register::<Sensor>().unwrap();
        registry.register::<Hub>().unwrap();
        Rc::new(registry)
    }

    fn sensor(reading: f32) -> BindRef {
        bind_ref(Sensor { reading, feed: ChangeFeed::new() })
    }

    fn value_of(registry: &TypeRegistry, obj: &BindRef, name: &str) -> f32 {
        registry
            .property_of(obj, name)
            .unwrap()
            .get()
            .unwrap()
            .as_float()
            .unwrap()
    }

    // ── rebinding across swaps ────────────────────────────────────────────

    #[test]
    fn tracks_intermediate_swap() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let hub = bind_ref(Hub::default());
        let x = sensor(1.0);
        let y = sensor(2.0);

        registry
            .property_of(&hub, "active")
            .unwrap()
            .set(Value::Object(Some(Rc::clone(&x))))
            .unwrap();

        let a = registry.property_of(&display, "value").unwrap();
        let multi = MultiBinding::new(
            &registry,
            a,
            &hub,
            &["active", "reading"],
            BindingMode::TwoWay,
            None,
        )
        .unwrap();
        assert!(multi.is_linked());
        assert_eq!(value_of(&registry, &display, "value"), 1.0);

        // Live propagation from X.
        registry
            .property_of(&x, "reading")
            .unwrap()
            .set(Value::Float(5.0))
            .unwrap();
        assert_eq!(value_of(&registry, &display, "value"), 5.0);

        // Swap X → Y: the binding re-seats onto Y.
        registry
            .property_of(&hub, "active")
            .unwrap()
            .set(Value::Object(Some(Rc::clone(&y))))
            .unwrap();
        assert_eq!(value_of(&registry, &display, "value"), 2.0);

        // X is unbound: no stale notifications reach the display.
        registry
            .property_of(&x, "reading")
            .unwrap()
            .set(Value::Float(99.0))
            .unwrap();
        assert_eq!(value_of(&registry, &display, "value"), 2.0);
        assert_eq!(x.borrow().feed().subscriber_count(), 0);

        // Y still drives.
        registry
            .property_of(&y, "reading")
            .unwrap()
            .set(Value::Float(7.0))
            .unwrap();
        assert_eq!(value_of(&registry, &display, "value"), 7.0);
    }

    #[test]
    fn unlinks_when_intermediate_vanishes() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let hub = bind_ref(Hub::default());
        let x = sensor(3.0);
        registry
            .property_of(&hub, "active")
            .unwrap()
            .set(Value::Object(Some(Rc::clone(&x))))
            .unwrap();

        let a = registry.property_of(&display, "value").unwrap();
        let multi = MultiBinding::new(
            &registry,
            a,
            &hub,
            &["active", "reading"],
            BindingMode::TwoWay,
            None,
        )
        .unwrap();
        assert!(multi.is_linked());

        registry
            .property_of(&hub, "active")
            .unwrap()
            .set(Value::Object(None))
            .unwrap();
        assert!(!multi.is_linked());
        assert_eq!(x.borrow().feed().subscriber_count(), 0);
    }

    #[test]
    fn starts_unlinked_when_intermediate_absent() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let hub = bind_ref(Hub::default());
        let a = registry.property_of(&display, "value").unwrap();
        let multi = MultiBinding::new(
            &registry,
            a,
            &hub,
            &["active", "reading"],
            BindingMode::TwoWay,
            None,
        )
        .unwrap();
        assert!(!multi.is_linked());
    }

    // ── construction failures ─────────────────────────────────────────────

    #[test]
    fn non_object_hop_fails() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let other = bind_ref(Display::default());
        let a = registry.property_of(&display, "value").unwrap();
        assert!(matches!(
            MultiBinding::new(
                &registry,
                a,
                &other,
                &["value", "reading"],
                BindingMode::TwoWay,
                None
            )
            .unwrap_err(),
            ReflectError::BadPath(_)
        ));
    }

    #[test]
    fn missing_final_property_is_a_hard_error() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let hub = bind_ref(Hub::default());
        let x = sensor(0.0);
        registry
            .property_of(&hub, "active")
            .unwrap()
            .set(Value::Object(Some(Rc::clone(&x))))
            .unwrap();

        let a = registry.property_of(&display, "value").unwrap();
        let err = MultiBinding::new(
            &registry,
            a,
            &hub,
            &["active", "nonexistent"],
            BindingMode::TwoWay,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ReflectError::MissingProperty { .. }));
        // The failed construction left nothing subscribed.
        assert_eq!(hub.borrow().feed().subscriber_count(), 0);
        assert_eq!(x.borrow().feed().subscriber_count(), 0);
    }

    #[test]
    fn short_path_is_rejected() {
        let registry = setup();
        let display = bind_ref(Display::default());
        let hub = bind_ref(Hub::default());
        let a = registry.property_of(&display, "value").unwrap();
        assert!(matches!(
            MultiBinding::new(&registry, a, &hub, &["active"], BindingMode::TwoWay, None)
                .unwrap_err(),
            ReflectError::BadPath(_)
        ));
    }
}
