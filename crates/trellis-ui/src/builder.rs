use std::collections::HashMap;
use std::rc::Rc;

use trellis_core::paint::Color;
use trellis_reflect::{
    BindRef, Binding, Converter, MultiBinding, Reflected, ReflectError, TypeRegistry,
};

use crate::element::{Element, ElementRef};
use crate::error::BuildError;
use crate::markup::{BindSpec, MarkupNode};
use crate::widgets::{Grid, Label, PageView, Panel, Stack};

// ── ElementRegistry ───────────────────────────────────────────────────────

/// Maps markup element type names to element factories. Registering a
/// type here also registers its reflected descriptor, so the builder can
/// reach its properties.
pub struct ElementRegistry {
    builders: HashMap<&'static str, Box<dyn Fn() -> ElementRef>>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self { builders: HashMap::new() }
    }

    /// Registry preloaded with the built-in widgets.
    pub fn with_builtins(types: &mut TypeRegistry) -> Result<Self, ReflectError> {
        let mut elements = Self::new();
        elements.insert::<Panel>(types)?;
        elements.insert::<Label>(types)?;
        elements.insert::<Stack>(types)?;
        elements.insert::<Grid>(types)?;
        elements.insert::<PageView>(types)?;
        Ok(elements)
    }

    pub fn insert<E: Element + Reflected + Default>(
        &mut self,
        types: &mut TypeRegistry,
    ) -> Result<(), ReflectError> {
        types.register::<E>()?;
        self.builders
            .insert(E::TYPE_NAME, Box::new(|| ElementRef::new(E::default())));
        Ok(())
    }

    fn instantiate(&self, name: &str) -> Option<ElementRef> {
        self.builders.get(name).map(|build| build())
    }
}

// ── BuiltTree ─────────────────────────────────────────────────────────────

/// A live binding owned by a built tree. Dropping the tree drops the
/// handles, which unsubscribes everything.
#[derive(Debug)]
pub enum BindingHandle {
    Single(Binding),
    Multi(MultiBinding),
}

#[derive(Debug)]
pub struct BuiltTree {
    pub root: ElementRef,
    pub bindings: Vec<BindingHandle>,
}

// ── TreeBuilder ───────────────────────────────────────────────────────────

struct PendingBind {
    element: ElementRef,
    attribute: String,
    spec: BindSpec,
}

/// Turns a [`MarkupNode`] tree into live elements plus their bindings.
///
/// Unknown element types and unresolvable attributes or binding targets
/// are logged and skipped; malformed `{bind …}` declarations and binding
/// construction failures abort the build.
pub struct TreeBuilder {
    types: Rc<TypeRegistry>,
    elements: ElementRegistry,
    converters: HashMap<String, Rc<dyn Converter>>,
    models: HashMap<String, BindRef>,
}

impl TreeBuilder {
    pub fn new(types: Rc<TypeRegistry>, elements: ElementRegistry) -> Self {
        Self {
            types,
            elements,
            converters: HashMap::new(),
            models: HashMap::new(),
        }
    }

    /// Make a converter available to `converter=<id>` references.
    pub fn converter(mut self, id: impl Into<String>, converter: Rc<dyn Converter>) -> Self {
        self.converters.insert(id.into(), converter);
        self
    }

    /// Register a non-element binding target reachable by id.
    pub fn model(mut self, id: impl Into<String>, object: BindRef) -> Self {
        self.models.insert(id.into(), object);
        self
    }

    pub fn build(&self, markup: &MarkupNode) -> Result<BuiltTree, BuildError> {
        let mut pending = Vec::new();
        let root = self
            .build_node(markup, &mut pending)?
            .ok_or(BuildError::EmptyTree)?;
        // Bindings connect after the whole tree exists, so forward
        // references between siblings resolve.
        let mut bindings = Vec::new();
        for bind in pending {
            if let Some(handle) = self.connect(&root, bind)? {
                bindings.push(handle);
            }
        }
        Ok(BuiltTree { root, bindings })
    }

    /// Like [`build`], but a failed load yields a single error label in
    /// place of the whole tree instead of a blank screen.
    ///
    /// [`build`]: TreeBuilder::build
    pub fn build_or_fallback(&self, markup: &MarkupNode) -> BuiltTree {
        match self.build(markup) {
            Ok(tree) => tree,
            Err(err) => {
                log::error!("markup load failed: {err}");
                let label =
                    Label::named("error", format!("load failed: {err}")).with_color(Color::RED);
                BuiltTree {
                    root: ElementRef::new(label),
                    bindings: Vec::new(),
                }
            }
        }
    }

    // ── internal ──────────────────────────────────────────────────────────

    fn build_node(
        &self,
        node: &MarkupNode,
        pending: &mut Vec<PendingBind>,
    ) -> Result<Option<ElementRef>, BuildError> {
        let Some(element) = self.elements.instantiate(&node.name) else {
            let err = BuildError::UnknownElement(node.name.clone());
            log::warn!("{err}, skipping subtree");
            return Ok(None);
        };
        self.apply_attrs(&element, node, pending)?;
        for child_node in &node.children {
            let Some(child) = self.build_node(child_node, pending)? else {
                continue;
            };
            if !element.borrow_mut().adopt(child) {
                log::warn!(
                    "{:?} takes no children, dropping {:?}",
                    node.name,
                    child_node.name
                );
            }
        }
        Ok(Some(element))
    }

    fn apply_attrs(
        &self,
        element: &ElementRef,
        node: &MarkupNode,
        pending: &mut Vec<PendingBind>,
    ) -> Result<(), BuildError> {
        for (key, raw) in &node.attrs {
            match BindSpec::parse(raw) {
                Some(Ok(spec)) => pending.push(PendingBind {
                    element: element.clone(),
                    attribute: key.clone(),
                    spec,
                }),
                Some(Err(err)) => return Err(err),
                None => {
                    let property = match self.types.property_of(element.object(), key) {
                        Ok(property) => property,
                        Err(err) => {
                            log::warn!("{}: skipping attribute {key:?}: {err}", node.name);
                            continue;
                        }
                    };
                    if let Err(err) = property.set_text(raw) {
                        log::warn!("{}.{key}: skipping value {raw:?}: {err}", node.name);
                    }
                }
            }
        }
        Ok(())
    }

    fn connect(
        &self,
        root: &ElementRef,
        bind: PendingBind,
    ) -> Result<Option<BindingHandle>, BuildError> {
        let PendingBind { element, attribute, spec } = bind;

        let a = self.types.property_of(element.object(), &attribute)?;
        let target: BindRef = match root.find(&spec.target) {
            Some(found) => Rc::clone(found.object()),
            None => match self.models.get(&spec.target) {
                Some(object) => Rc::clone(object),
                None => {
                    let err = BuildError::UnknownTarget(spec.target.clone());
                    log::warn!("{err}, skipping binding on {attribute:?}");
                    return Ok(None);
                }
            },
        };
        let converter = spec
            .converter
            .as_ref()
            .map(|id| {
                self.converters
                    .get(id)
                    .cloned()
                    .ok_or_else(|| BuildError::UnknownConverter(id.clone()))
            })
            .transpose()?;

        let handle = match spec.path.as_slice() {
            [] => {
                let b = self.types.property_of(&target, &attribute)?;
                BindingHandle::Single(Binding::new(a, b, spec.mode, converter)?)
            }
            [single] => {
                let b = self.types.property_of(&target, single)?;
                BindingHandle::Single(Binding::new(a, b, spec.mode, converter)?)
            }
            path => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                BindingHandle::Multi(MultiBinding::new(
                    &self.types,
                    a,
                    &target,
                    &segments,
                    spec.mode,
                    converter,
                )?)
            }
        };
        Ok(Some(handle))
    }
}
