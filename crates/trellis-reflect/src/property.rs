use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ReflectError;
use crate::value::{Kind, Value};

// ── Bindable ──────────────────────────────────────────────────────────────

/// An object exposing named properties and a change-notification feed.
///
/// Concrete types embed a [`ChangeFeed`] and hand it out through `feed` —
/// composition instead of a notifying base class. `as_any`/`as_any_mut`
/// let type-erased property descriptors reach the concrete fields.
pub trait Bindable: Any {
    fn type_name(&self) -> &'static str;
    fn feed(&self) -> &ChangeFeed;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn Bindable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bindable({})", self.type_name())
    }
}

/// Shared handle to a bindable object.
pub type BindRef = Rc<RefCell<dyn Bindable>>;
/// Non-owning handle; `upgrade` answers "does the owner still exist".
pub type WeakBindRef = Weak<RefCell<dyn Bindable>>;

/// Erase a concrete bindable into a shared handle.
pub fn bind_ref<T: Bindable>(value: T) -> BindRef {
    Rc::new(RefCell::new(value))
}

// ── SubToken ──────────────────────────────────────────────────────────────

/// Opaque subscriber identity. Each consumer (a binding, a UI accessor)
/// holds one token and uses it for all of its subscriptions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

impl SubToken {
    pub fn next() -> SubToken {
        SubToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

// ── ChangeFeed ────────────────────────────────────────────────────────────

/// Per-property change callback.
pub type ChangeCallback = Rc<dyn Fn(&Property)>;

struct Subscriber {
    token: SubToken,
    property: String,
    callback: ChangeCallback,
}

/// Change-notification feed embedded in every bindable object.
///
/// Subscribers are keyed by `(token, property)`; re-subscribing the same
/// pair replaces the callback in place, so notification order is
/// registration order and stays stable across replacement. Fan-out is a
/// plain synchronous call chain — a callback that mutates the originating
/// property will recurse, guarded only by the binding layer's suppression
/// flag.
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: RefCell<Vec<Subscriber>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, token: SubToken, property: &str, callback: ChangeCallback) {
        let mut subs = self.subscribers.borrow_mut();
        if let Some(existing) = subs
            .iter_mut()
            .find(|s| s.token == token && s.property == property)
        {
            existing.callback = callback;
        } else {
            subs.push(Subscriber { token, property: property.to_owned(), callback });
        }
    }

    /// Remove every subscription held under `token`.
    pub fn unsubscribe(&self, token: SubToken) {
        self.subscribers.borrow_mut().retain(|s| s.token != token);
    }

    /// Snapshot the callbacks for `property`, in registration order.
    ///
    /// The snapshot is taken so the subscriber list is not borrowed while
    /// callbacks run — callbacks may subscribe or unsubscribe.
    fn snapshot(&self, property: &str) -> Vec<ChangeCallback> {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.property == property)
            .map(|s| Rc::clone(&s.callback))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

// ── PropertyDesc ──────────────────────────────────────────────────────────

type Getter = Box<dyn Fn(&dyn Bindable) -> Result<Value, ReflectError>>;
type Setter = Box<dyn Fn(&mut dyn Bindable, Value) -> Result<(), ReflectError>>;

/// A named, typed accessor template. Bound to an owner it becomes a
/// [`Property`]. Built by `TypeBuilder`; three variants exist — direct
/// field, read-only computed (no setter), and matched getter/setter pair.
pub struct PropertyDesc {
    pub(crate) name: &'static str,
    pub(crate) kind: Kind,
    pub(crate) get: Getter,
    pub(crate) set: Option<Setter>,
}

impl fmt::Debug for PropertyDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDesc")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.writable())
            .finish()
    }
}

impl PropertyDesc {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn writable(&self) -> bool {
        self.set.is_some()
    }

    /// Bind this descriptor to an owner, producing a live property.
    pub fn bind(self: &Rc<Self>, owner: &BindRef) -> Property {
        Property {
            owner: Rc::downgrade(owner),
            desc: Rc::clone(self),
        }
    }
}

// ── Property ──────────────────────────────────────────────────────────────

/// A named, typed accessor bound to one (weakly held) object instance.
///
/// The kind is fixed for the property's lifetime. A successful [`set`]
/// notifies the owner's subscribers exactly once, synchronously, before
/// returning. A vanished owner makes `set` a no-op and `get` an
/// [`ReflectError::OwnerGone`].
///
/// [`set`]: Property::set
#[derive(Clone)]
pub struct Property {
    owner: WeakBindRef,
    desc: Rc<PropertyDesc>,
}

impl Property {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.desc.kind
    }

    #[inline]
    pub fn writable(&self) -> bool {
        self.desc.writable()
    }

    #[inline]
    pub fn owner_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    pub fn get(&self) -> Result<Value, ReflectError> {
        let owner = self.owner.upgrade().ok_or(ReflectError::OwnerGone)?;
        let guard = owner.borrow();
        (self.desc.get)(&*guard)
    }

    pub fn set(&self, value: Value) -> Result<(), ReflectError> {
        // Owner gone: tolerated as a no-op, the owner simply outlived us.
        let Some(owner) = self.owner.upgrade() else {
            return Ok(());
        };
        if value.kind() != self.desc.kind {
            return Err(ReflectError::TypeMismatch {
                expected: self.desc.kind,
                found: value.kind(),
            });
        }
        let set = self
            .desc
            .set
            .as_ref()
            .ok_or(ReflectError::ReadOnlyProperty(self.desc.name))?;
        {
            let mut guard = owner.borrow_mut();
            set(&mut *guard, value)?;
        }
        // Borrows are released before fan-out so callbacks can re-enter
        // the owner (cycles are the binding layer's problem).
        let callbacks = owner.borrow().feed().snapshot(self.desc.name);
        let notified = Property {
            owner: self.owner.clone(),
            desc: Rc::clone(&self.desc),
        };
        for callback in callbacks {
            callback(&notified);
        }
        Ok(())
    }

    /// Canonical string form of the current value.
    pub fn text(&self) -> Result<String, ReflectError> {
        self.get()?.format()
    }

    /// Parse `input` with this property's grammar and set it.
    pub fn set_text(&self, input: &str) -> Result<(), ReflectError> {
        self.set(Value::parse(self.desc.kind, input)?)
    }

    pub fn subscribe(&self, token: SubToken, callback: ChangeCallback) {
        if let Some(owner) = self.owner.upgrade() {
            owner.borrow().feed().subscribe(token, self.desc.name, callback);
        }
    }

    pub fn unsubscribe(&self, token: SubToken) {
        if let Some(owner) = self.owner.upgrade() {
            owner.borrow().feed().unsubscribe(token);
        }
    }
}
