//! Runtime reflection and data binding for Trellis objects.
//!
//! Any object implementing [`Bindable`] and describing itself to the
//! [`TypeRegistry`] gains named, typed properties that can be read and
//! written dynamically, observed for changes, and coupled to each other
//! with [`Binding`]s — directly, through canonical string forms, or
//! through stateful [`Converter`]s.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | `Value`, `Kind` — the dynamic value model |
//! | [`property`] | `Bindable`, `Property`, `ChangeFeed`, subscriptions |
//! | [`registry`] | `TypeRegistry`, `TypeDescriptor`, `Reflected` |
//! | [`convert`] | `Converter`, `NumericCast`, `LookupTable` |
//! | [`binding`] | `Binding`, `BindingMode` — two-endpoint coupling |
//! | [`multi`] | `MultiBinding` — dotted-path bindings that re-seat |
//! | [`error`] | `ReflectError` |
//!
//! # Threading and re-entrancy
//!
//! The whole engine is single-threaded: objects live in
//! `Rc<RefCell<_>>` handles and change callbacks run synchronously
//! inside the `set` that triggered them. A property releases its
//! owner's borrow before fan-out, so callbacks may freely read or
//! write the object that changed; bindings guard against their own
//! echo with a suppression flag, but nothing guards arbitrary
//! subscriber cycles — a callback that sets the property it is
//! watching recurses until it stops producing changes.
//!
//! # Quick start
//!
//! ```rust
//! use std::any::Any;
//! use trellis_reflect::{
//!     BindRef, Bindable, ChangeFeed, Kind, Reflected, TypeBuilder,
//!     TypeRegistry, Value, bind_ref,
//! };
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: i64,
//!     feed: ChangeFeed,
//! }
//!
//! impl Bindable for Counter {
//!     fn type_name(&self) -> &'static str { Self::TYPE_NAME }
//!     fn feed(&self) -> &ChangeFeed { &self.feed }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! impl Reflected for Counter {
//!     const TYPE_NAME: &'static str = "Counter";
//!     fn describe(b: &mut TypeBuilder<Self>) {
//!         b.field(
//!             "count",
//!             Kind::Int,
//!             |c| Value::Int(c.count),
//!             |c, v| { c.count = v.as_int()?; Ok(()) },
//!         );
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Counter>().unwrap();
//!
//! let counter: BindRef = bind_ref(Counter::default());
//! let count = registry.property_of(&counter, "count").unwrap();
//! count.set(Value::Int(3)).unwrap();
//! assert_eq!(count.get().unwrap(), Value::Int(3));
//! ```

pub mod binding;
pub mod convert;
pub mod error;
pub mod multi;
pub mod property;
pub mod registry;
pub mod value;

pub use binding::{Binding, BindingMode};
pub use convert::{Converter, DualVar, LookupTable, NumericCast};
pub use error::ReflectError;
pub use multi::MultiBinding;
pub use property::{BindRef, Bindable, ChangeFeed, Property, SubToken, WeakBindRef, bind_ref};
pub use registry::{Reflected, TypeBuilder, TypeDescriptor, TypeRegistry};
pub use value::{Kind, Value};
