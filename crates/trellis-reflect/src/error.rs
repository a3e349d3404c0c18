use std::fmt;

use crate::value::Kind;

/// Errors raised by the reflection and binding engine.
///
/// The variants fall into the four failure classes the engine
/// distinguishes:
///
/// - registration errors (`DuplicateProperty`, `SetterWithoutGetter`) —
///   fatal at type-registration time;
/// - resolution errors (`UnknownType`, `MissingProperty`) — the tree walk
///   around a lookup decides whether to skip or abort;
/// - binding construction errors (`ConverterMismatch`,
///   `UnwritableBinding`, `BadPath`, `NotNumeric`, `EmptyTable`) — hard
///   failures for the one binding being built;
/// - runtime conversion errors (`Parse`, `TypeMismatch`, `NoStringForm`,
///   `ReadOnlyProperty`, `OwnerGone`, `WrongInstance`) — recoverable,
///   reported to the caller or logged by the propagation path.
#[derive(Debug, Clone, PartialEq)]
pub enum ReflectError {
    /// No type with this name is registered.
    UnknownType(String),
    /// The type exists but has no property with this name.
    MissingProperty {
        type_name: String,
        property: String,
    },
    /// A property name was registered twice on one type.
    DuplicateProperty {
        type_name: &'static str,
        property: &'static str,
    },
    /// A setter was registered without a matching getter of the same name.
    SetterWithoutGetter {
        type_name: &'static str,
        property: &'static str,
    },
    /// Write attempted on a read-only property.
    ReadOnlyProperty(&'static str),
    /// A value of the wrong kind reached a typed endpoint.
    TypeMismatch { expected: Kind, found: Kind },
    /// A canonical string failed its grammar.
    Parse { kind: Kind, input: String },
    /// The value kind has no canonical string form (objects).
    NoStringForm(Kind),
    /// The type has no registered default constructor.
    NoConstructor(String),
    /// A property descriptor was applied to an instance of another type.
    WrongInstance(&'static str),
    /// Converter from/to kinds match neither endpoint order.
    ConverterMismatch {
        from: Kind,
        to: Kind,
        a: Kind,
        b: Kind,
    },
    /// Both binding endpoints are read-only, or the driven endpoint is.
    UnwritableBinding,
    /// The bound owner no longer exists.
    OwnerGone,
    /// A multi-level binding path is malformed or not object-typed.
    BadPath(String),
    /// A numeric converter was given a non-numeric kind.
    NotNumeric(Kind),
    /// A lookup-table converter needs at least one entry.
    EmptyTable,
}

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectError::UnknownType(name) => write!(f, "unknown type {name:?}"),
            ReflectError::MissingProperty { type_name, property } => {
                write!(f, "type {type_name:?} has no property {property:?}")
            }
            ReflectError::DuplicateProperty { type_name, property } => {
                write!(f, "duplicate property {property:?} on type {type_name:?}")
            }
            ReflectError::SetterWithoutGetter { type_name, property } => {
                write!(f, "setter {property:?} on type {type_name:?} has no matching getter")
            }
            ReflectError::ReadOnlyProperty(name) => {
                write!(f, "property {name:?} is read-only")
            }
            ReflectError::TypeMismatch { expected, found } => {
                write!(f, "expected a {expected} value, found {found}")
            }
            ReflectError::Parse { kind, input } => {
                write!(f, "cannot parse {input:?} as {kind}")
            }
            ReflectError::NoStringForm(kind) => {
                write!(f, "{kind} values have no canonical string form")
            }
            ReflectError::NoConstructor(name) => {
                write!(f, "type {name:?} has no default constructor")
            }
            ReflectError::WrongInstance(type_name) => {
                write!(f, "property descriptor of {type_name:?} applied to another type")
            }
            ReflectError::ConverterMismatch { from, to, a, b } => {
                write!(
                    f,
                    "converter {from}\u{2192}{to} matches neither endpoint order ({a}, {b})"
                )
            }
            ReflectError::UnwritableBinding => {
                write!(f, "binding has no writable endpoint to drive")
            }
            ReflectError::OwnerGone => write!(f, "bound owner no longer exists"),
            ReflectError::BadPath(path) => write!(f, "bad binding path {path:?}"),
            ReflectError::NotNumeric(kind) => {
                write!(f, "numeric cast cannot handle {kind} values")
            }
            ReflectError::EmptyTable => write!(f, "lookup table has no entries"),
        }
    }
}

impl std::error::Error for ReflectError {}
