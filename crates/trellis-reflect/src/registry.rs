use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::ReflectError;
use crate::property::{BindRef, Bindable, Property, PropertyDesc, bind_ref};
use crate::value::{Kind, Value};

// ── Reflected ─────────────────────────────────────────────────────────────

/// A type that can describe its properties to the registry.
pub trait Reflected: Bindable + Sized {
    const TYPE_NAME: &'static str;
    fn describe(builder: &mut TypeBuilder<Self>);
}

// ── TypeBuilder ───────────────────────────────────────────────────────────

/// Collects property descriptors for one type during registration.
///
/// Validation happens here, at registration time, and is fatal: duplicate
/// property names and setters without a matching getter fail the whole
/// `register` call rather than surfacing at runtime.
pub struct TypeBuilder<T: Bindable> {
    type_name: &'static str,
    props: Vec<PropertyDesc>,
    index: HashMap<&'static str, usize>,
    construct: Option<Box<dyn Fn() -> BindRef>>,
    error: Option<ReflectError>,
    _marker: std::marker::PhantomData<fn(T)>,
}

fn typed_get<T: Bindable>(
    type_name: &'static str,
    get: impl Fn(&T) -> Value + 'static,
) -> Box<dyn Fn(&dyn Bindable) -> Result<Value, ReflectError>> {
    Box::new(move |obj| {
        let t = obj
            .as_any()
            .downcast_ref::<T>()
            .ok_or(ReflectError::WrongInstance(type_name))?;
        Ok(get(t))
    })
}

fn typed_set<T: Bindable>(
    type_name: &'static str,
    set: impl Fn(&mut T, Value) -> Result<(), ReflectError> + 'static,
) -> Box<dyn Fn(&mut dyn Bindable, Value) -> Result<(), ReflectError>> {
    Box::new(move |obj, value| {
        let t = obj
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(ReflectError::WrongInstance(type_name))?;
        set(t, value)
    })
}

impl<T: Bindable> TypeBuilder<T> {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            props: Vec::new(),
            index: HashMap::new(),
            construct: None,
            error: None,
            _marker: std::marker::PhantomData,
        }
    }

    fn push(&mut self, desc: PropertyDesc) {
        if self.error.is_some() {
            return;
        }
        if self.index.contains_key(desc.name) {
            self.error = Some(ReflectError::DuplicateProperty {
                type_name: self.type_name,
                property: desc.name,
            });
            return;
        }
        self.index.insert(desc.name, self.props.len());
        self.props.push(desc);
    }

    /// Read-write direct field access.
    pub fn field(
        &mut self,
        name: &'static str,
        kind: Kind,
        get: impl Fn(&T) -> Value + 'static,
        set: impl Fn(&mut T, Value) -> Result<(), ReflectError> + 'static,
    ) -> &mut Self {
        self.push(PropertyDesc {
            name,
            kind,
            get: typed_get(self.type_name, get),
            set: Some(typed_set(self.type_name, set)),
        });
        self
    }

    /// Read-only computed property. Writes fail with a read-only error.
    pub fn getter(
        &mut self,
        name: &'static str,
        kind: Kind,
        get: impl Fn(&T) -> Value + 'static,
    ) -> &mut Self {
        self.push(PropertyDesc {
            name,
            kind,
            get: typed_get(self.type_name, get),
            set: None,
        });
        self
    }

    /// Attach a setter to a previously registered getter of the same name,
    /// turning it into a read-write computed pair. Registering a setter
    /// with no matching getter, or onto an already-writable property, is
    /// a registration failure.
    pub fn setter(
        &mut self,
        name: &'static str,
        set: impl Fn(&mut T, Value) -> Result<(), ReflectError> + 'static,
    ) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let mismatch = ReflectError::SetterWithoutGetter {
            type_name: self.type_name,
            property: name,
        };
        let Some(&slot) = self.index.get(name) else {
            self.error = Some(mismatch);
            return self;
        };
        let existing = &mut self.props[slot];
        if existing.writable() {
            self.error = Some(mismatch);
            return self;
        }
        existing.set = Some(typed_set(self.type_name, set));
        self
    }

    /// Register a default constructor used by `TypeDescriptor::instantiate`.
    pub fn constructor(&mut self, construct: impl Fn() -> T + 'static) -> &mut Self {
        self.construct = Some(Box::new(move || bind_ref(construct())));
        self
    }

    fn finish(self) -> Result<TypeDescriptor, ReflectError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(TypeDescriptor {
            name: self.type_name,
            props: self.props.into_iter().map(Rc::new).collect(),
            index: self.index,
            construct: self.construct,
        })
    }
}

// ── TypeDescriptor ────────────────────────────────────────────────────────

/// A registered type: its name, its property descriptors (in registration
/// order), and an optional default constructor.
pub struct TypeDescriptor {
    name: &'static str,
    props: Vec<Rc<PropertyDesc>>,
    index: HashMap<&'static str, usize>,
    construct: Option<Box<dyn Fn() -> BindRef>>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("props", &self.props)
            .field("constructible", &self.construct.is_some())
            .finish()
    }
}

impl TypeDescriptor {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Property descriptors in registration order.
    pub fn properties(&self) -> impl Iterator<Item = &Rc<PropertyDesc>> {
        self.props.iter()
    }

    /// Look up a property descriptor. A miss is a hard error, distinct
    /// from an unknown type.
    pub fn property(&self, name: &str) -> Result<&Rc<PropertyDesc>, ReflectError> {
        self.index
            .get(name)
            .map(|&i| &self.props[i])
            .ok_or_else(|| ReflectError::MissingProperty {
                type_name: self.name.to_owned(),
                property: name.to_owned(),
            })
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Default-construct a fresh instance of this type.
    pub fn instantiate(&self) -> Result<BindRef, ReflectError> {
        match &self.construct {
            Some(construct) => Ok(construct()),
            None => Err(ReflectError::NoConstructor(self.name.to_owned())),
        }
    }
}

// ── TypeRegistry ──────────────────────────────────────────────────────────

/// Maps type names to descriptors and resolves the dynamic type of live
/// instances.
///
/// Built once per application, passed explicitly through construction —
/// there is no global registry. `register` caches: the first call for a
/// type builds its descriptor, later calls return the cached one.
pub struct TypeRegistry {
    types: Vec<Rc<TypeDescriptor>>,
    index: HashMap<&'static str, usize>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self { types: Vec::new(), index: HashMap::new() };
        // The multi-level binding bridge type is always available.
        let _ = registry.register::<crate::multi::LinkProbe>();
        registry
    }

    /// Build and cache the descriptor for `T` exactly once.
    pub fn register<T: Reflected>(&mut self) -> Result<Rc<TypeDescriptor>, ReflectError> {
        if let Some(&slot) = self.index.get(T::TYPE_NAME) {
            return Ok(Rc::clone(&self.types[slot]));
        }
        let mut builder = TypeBuilder::<T>::new(T::TYPE_NAME);
        T::describe(&mut builder);
        let descriptor = Rc::new(builder.finish()?);
        self.index.insert(T::TYPE_NAME, self.types.len());
        self.types.push(Rc::clone(&descriptor));
        log::debug!("registered type {:?}", T::TYPE_NAME);
        Ok(descriptor)
    }

    /// Look up a type by name. `None` is the recoverable "not found"
    /// signal — the caller decides whether to error or skip.
    pub fn find_type(&self, name: &str) -> Option<Rc<TypeDescriptor>> {
        self.index.get(name).map(|&i| Rc::clone(&self.types[i]))
    }

    /// Resolve the dynamic type of a live instance.
    pub fn type_of(&self, instance: &BindRef) -> Result<Rc<TypeDescriptor>, ReflectError> {
        let name = instance.borrow().type_name();
        self.find_type(name)
            .ok_or_else(|| ReflectError::UnknownType(name.to_owned()))
    }

    /// Descriptor of `instance` when present, falling back to the static
    /// type name for descriptor-only queries with no instance at hand.
    pub fn descriptor(
        &self,
        instance: Option<&BindRef>,
        static_name: &str,
    ) -> Option<Rc<TypeDescriptor>> {
        match instance {
            Some(obj) => {
                let name = obj.borrow().type_name();
                self.find_type(name)
            }
            None => self.find_type(static_name),
        }
    }

    /// Resolve a named property on a live instance into a bound property.
    pub fn property_of(&self, instance: &BindRef, name: &str) -> Result<Property, ReflectError> {
        let descriptor = self.type_of(instance)?;
        Ok(descriptor.property(name)?.bind(instance))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::ChangeFeed;
    use std::any::Any;

    #[derive(Default)]
    struct Dial {
        level: f32,
        feed: ChangeFeed,
    }

    impl Bindable for Dial {
        fn type_name(&self) -> &'static str {
            "Dial"
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
        const TYPE_NAME: &'static str = "Dial";

        fn describe(b: &mut TypeBuilder<Self>) {
            b.field(
                "level",
                Kind::Float,
                |d| Value::Float(d.level),
                |d, v| {
                    d.level = v.as_float()?;
                    Ok(())
                },
            );
            b.getter("doubled", Kind::Float, |d| Value::Float(d.level * 2.0));
            b.constructor(Dial::default);
        }
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn register_caches_once() {
        let mut registry = TypeRegistry::new();
        let first = registry.register::<Dial>().unwrap();
        let second = registry.register::<Dial>().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn descriptors_keep_registration_order() {
        let mut registry = TypeRegistry::new();
        let descriptor = registry.register::<Dial>().unwrap();
        let names: Vec<&str> = descriptor.properties().map(|p| p.name()).collect();
        assert_eq!(names, ["level", "doubled"]);
    }

    #[test]
    fn duplicate_property_fails_registration() {
        struct Twice {
            feed: ChangeFeed,
        }
        impl Bindable for Twice {
            fn type_name(&self) -> &'static str {
                "Twice"
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
        impl Reflected for Twice {
            const TYPE_NAME: &'static str = "Twice";
            fn describe(b: &mut TypeBuilder<Self>) {
                b.getter("x", Kind::Int, |_| Value::Int(0));
                b.getter("x", Kind::Int, |_| Value::Int(1));
            }
        }
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.register::<Twice>().unwrap_err(),
            ReflectError::DuplicateProperty { type_name: "Twice", property: "x" }
        );
    }

    #[test]
    fn setter_without_getter_fails_registration() {
        struct Orphan {
            feed: ChangeFeed,
        }
        impl Bindable for Orphan {
            fn type_name(&self) -> &'static str {
                "Orphan"
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
        impl Reflected for Orphan {
            const TYPE_NAME: &'static str = "Orphan";
            fn describe(b: &mut TypeBuilder<Self>) {
                b.setter("ghost", |_, _| Ok(()));
            }
        }
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.register::<Orphan>().unwrap_err(),
            ReflectError::SetterWithoutGetter { type_name: "Orphan", property: "ghost" }
        );
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn find_type_is_recoverable_missing_property_is_hard() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dial>().unwrap();
        assert!(registry.find_type("Nope").is_none());
        let dial = registry.find_type("Dial").unwrap();
        assert!(matches!(
            dial.property("nope").unwrap_err(),
            ReflectError::MissingProperty { .. }
        ));
    }

    #[test]
    fn type_of_resolves_dynamic_type() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dial>().unwrap();
        let instance: BindRef = bind_ref(Dial::default());
        assert_eq!(registry.type_of(&instance).unwrap().name(), "Dial");
    }

    #[test]
    fn descriptor_falls_back_to_static_name() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dial>().unwrap();
        let descriptor = registry.descriptor(None, "Dial").unwrap();
        assert_eq!(descriptor.name(), "Dial");
    }

    // ── computed properties ───────────────────────────────────────────────

    #[test]
    fn readonly_computed_rejects_writes() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dial>().unwrap();
        let instance = bind_ref(Dial { level: 3.0, feed: ChangeFeed::new() });
        let doubled = registry.property_of(&instance, "doubled").unwrap();
        assert_eq!(doubled.get().unwrap(), Value::Float(6.0));
        assert_eq!(
            doubled.set(Value::Float(1.0)).unwrap_err(),
            ReflectError::ReadOnlyProperty("doubled")
        );
    }

    #[test]
    fn getter_setter_pair_is_writable() {
        struct Gauge {
            half: f32,
            feed: ChangeFeed,
        }
        impl Bindable for Gauge {
            fn type_name(&self) -> &'static str {
                "Gauge"
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
        impl Reflected for Gauge {
            const TYPE_NAME: &'static str = "Gauge";
            fn describe(b: &mut TypeBuilder<Self>) {
                b.getter("full", Kind::Float, |g| Value::Float(g.half * 2.0));
                b.setter("full", |g, v| {
                    g.half = v.as_float()? / 2.0;
                    Ok(())
                });
            }
        }
        let mut registry = TypeRegistry::new();
        registry.register::<Gauge>().unwrap();
        let gauge = bind_ref(Gauge { half: 1.0, feed: ChangeFeed::new() });
        let full = registry.property_of(&gauge, "full").unwrap();
        assert!(full.writable());
        full.set(Value::Float(10.0)).unwrap();
        assert_eq!(full.get().unwrap(), Value::Float(10.0));
    }

    // ── instantiation ─────────────────────────────────────────────────────

    #[test]
    fn instantiate_uses_registered_constructor() {
        let mut registry = TypeRegistry::new();
        let descriptor = registry.register::<Dial>().unwrap();
        let fresh = descriptor.instantiate().unwrap();
        assert_eq!(registry.property_of(&fresh, "level").unwrap().get().unwrap(), Value::Float(0.0));
    }

    #[test]
    fn instantiate_without_constructor_fails() {
        struct Fixed {
            feed: ChangeFeed,
        }
        impl Bindable for Fixed {
            fn type_name(&self) -> &'static str {
                "Fixed"
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
        impl Reflected for Fixed {
            const TYPE_NAME: &'static str = "Fixed";
            fn describe(b: &mut TypeBuilder<Self>) {
                b.getter("x", Kind::Int, |_| Value::Int(0));
            }
        }
        let mut registry = TypeRegistry::new();
        let descriptor = registry.register::<Fixed>().unwrap();
        assert_eq!(
            descriptor.instantiate().unwrap_err(),
            ReflectError::NoConstructor("Fixed".to_owned())
        );
    }
}
