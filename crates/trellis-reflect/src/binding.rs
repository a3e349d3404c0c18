use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::convert::{Converter, DualVar};
use crate::error::ReflectError;
use crate::property::{Property, SubToken};

// ── BindingMode ───────────────────────────────────────────────────────────

/// Update-propagation direction of a binding between endpoint A and
/// endpoint B.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BindingMode {
    /// B drives A; changes to A are not pushed back (default).
    #[default]
    OneWay,
    /// Both directions, echo-guarded by the suppression flag.
    TwoWay,
    /// Apply once at construction; no subscriptions.
    OneTime,
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingMode::OneWay => "oneway",
            BindingMode::TwoWay => "twoway",
            BindingMode::OneTime => "onetime",
        })
    }
}

impl FromStr for BindingMode {
    type Err = ReflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "oneway" => Ok(BindingMode::OneWay),
            "twoway" => Ok(BindingMode::TwoWay),
            "onetime" => Ok(BindingMode::OneTime),
            other => Err(ReflectError::BadPath(format!("unknown binding mode {other:?}"))),
        }
    }
}

// ── internals ─────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Constructing,
    Active,
    Disposed,
}

#[derive(Debug, Copy, Clone)]
enum Side {
    A,
    B,
}

enum Route {
    /// Identical endpoint kinds, no converter: values copy directly.
    Direct,
    /// Differing kinds, no converter: copy through the canonical string
    /// forms.
    Text,
    /// Converter with dual-variable state. `flipped` records that the
    /// converter's from/to kinds matched the endpoints in B→A order.
    Converted {
        converter: Rc<dyn Converter>,
        state: RefCell<DualVar>,
        flipped: bool,
    },
}

struct BindingInner {
    a: Property,
    b: Property,
    route: Route,
    /// The sole cycle breaker: while a propagation is in flight, the echo
    /// notification from the destination endpoint is ignored.
    suppress: Cell<bool>,
    phase: Cell<Phase>,
    token: SubToken,
}

impl BindingInner {
    fn endpoint_changed(&self, source: Side) {
        if self.phase.get() != Phase::Active || self.suppress.get() {
            return;
        }
        self.suppress.set(true);
        let result = self.propagate(source);
        self.suppress.set(false);
        if let Err(err) = result {
            // Runtime conversion failures are recoverable: log and keep
            // the binding alive.
            log::warn!(
                "binding {}\u{2194}{}: propagation failed: {err}",
                self.a.name(),
                self.b.name()
            );
        }
    }

    fn propagate(&self, source: Side) -> Result<(), ReflectError> {
        let (from, to, forward) = match source {
            Side::A => (&self.a, &self.b, true),
            Side::B => (&self.b, &self.a, false),
        };
        match &self.route {
            Route::Direct => to.set(from.get()?),
            Route::Text => to.set_text(&from.text()?),
            Route::Converted { converter, state, flipped } => {
                // Push the source value into its dual-state slot, run the
                // converter, read the opposite slot out — stateful
                // converters see both sides.
                let conv_forward = forward != *flipped;
                let out = {
                    let mut slots = state.borrow_mut();
                    if conv_forward {
                        slots.from = from.get()?;
                    } else {
                        slots.to = from.get()?;
                    }
                    converter.apply(&mut slots, conv_forward)?;
                    if conv_forward { slots.to.clone() } else { slots.from.clone() }
                };
                to.set(out)
            }
        }
    }

    fn dispose(&self) {
        if self.phase.get() == Phase::Disposed {
            return;
        }
        self.phase.set(Phase::Disposed);
        self.a.unsubscribe(self.token);
        self.b.unsubscribe(self.token);
    }
}

// ── Binding ───────────────────────────────────────────────────────────────

/// A live coupling of two properties, possibly through a converter.
///
/// Lifecycle: *constructing* (resolve routing, validate, subscribe,
/// initial sync) → *active* (propagate on change, suppression-guarded) →
/// *disposed* (both subscriptions removed). Dropping the handle disposes.
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("a", &self.inner.a.name())
            .field("b", &self.inner.b.name())
            .field("phase", &self.inner.phase.get())
            .finish()
    }
}

impl Binding {
    /// Couple `a` and `b`.
    ///
    /// Construction fails hard when the converter's kinds match neither
    /// endpoint order, when no endpoint is writable, or when `mode` is
    /// [`BindingMode::OneWay`] and A (the driven side) is read-only. A
    /// failed construction leaves no subscriptions behind.
    pub fn new(
        a: Property,
        b: Property,
        mode: BindingMode,
        converter: Option<Rc<dyn Converter>>,
    ) -> Result<Binding, ReflectError> {
        if !a.writable() && !b.writable() {
            return Err(ReflectError::UnwritableBinding);
        }
        if mode == BindingMode::OneWay && !a.writable() {
            return Err(ReflectError::UnwritableBinding);
        }

        let route = match converter {
            Some(converter) => {
                let (from, to) = (converter.from_kind(), converter.to_kind());
                let flipped = if from == a.kind() && to == b.kind() {
                    false
                } else if from == b.kind() && to == a.kind() {
                    true
                } else {
                    return Err(ReflectError::ConverterMismatch {
                        from,
                        to,
                        a: a.kind(),
                        b: b.kind(),
                    });
                };
                Route::Converted {
                    state: RefCell::new(converter.make_state()),
                    converter,
                    flipped,
                }
            }
            None if a.kind() == b.kind() => Route::Direct,
            None => Route::Text,
        };

        let inner = Rc::new(BindingInner {
            a,
            b,
            route,
            suppress: Cell::new(false),
            phase: Cell::new(Phase::Constructing),
            token: SubToken::next(),
        });

        if mode != BindingMode::OneTime {
            // Subscribe only the side(s) whose counterpart can be written.
            if mode == BindingMode::TwoWay && inner.b.writable() {
                let weak = Rc::downgrade(&inner);
                inner.a.subscribe(
                    inner.token,
                    Rc::new(move |_| {
                        if let Some(inner) = weak.upgrade() {
                            inner.endpoint_changed(Side::A);
                        }
                    }),
                );
            }
            if inner.a.writable() {
                let weak = Rc::downgrade(&inner);
                inner.b.subscribe(
                    inner.token,
                    Rc::new(move |_| {
                        if let Some(inner) = weak.upgrade() {
                            inner.endpoint_changed(Side::B);
                        }
                    }),
                );
            }
        }

        // Initial sync: pull into the writable side; with both writable,
        // B's current value seeds A.
        inner.suppress.set(true);
        let initial = if inner.a.writable() {
            inner.propagate(Side::B)
        } else {
            inner.propagate(Side::A)
        };
        inner.suppress.set(false);
        if let Err(err) = initial {
            log::warn!(
                "binding {}\u{2194}{}: initial sync failed: {err}",
                inner.a.name(),
                inner.b.name()
            );
        }
        inner.phase.set(Phase::Active);

        Ok(Binding { inner })
    }

    /// Remove both subscriptions. Idempotent; also runs on drop.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// True when values copy without string round-tripping or conversion.
    pub fn is_direct(&self) -> bool {
        matches!(self.inner.route, Route::Direct)
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}
