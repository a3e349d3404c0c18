use std::fmt;

use trellis_reflect::ReflectError;

/// Tree-construction failure.
///
/// `UnknownElement` and `UnknownTarget` are recoverable — the builder logs
/// them and skips the offending subtree or attribute. The rest are hard:
/// a malformed binding declaration is a real bug in the markup, not input
/// noise.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Element type name not present in the element registry.
    UnknownElement(String),
    /// A `{bind …}` attribute that does not parse.
    BadBindRef(String),
    /// Binding target element/model id not found in the tree or models.
    UnknownTarget(String),
    /// `converter=<id>` names a converter the builder was not given.
    UnknownConverter(String),
    /// The root node itself could not be built.
    EmptyTree,
    /// Reflection or binding-construction failure.
    Reflect(ReflectError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnknownElement(name) => write!(f, "unknown element type {name:?}"),
            BuildError::BadBindRef(raw) => write!(f, "malformed binding reference {raw:?}"),
            BuildError::UnknownTarget(id) => write!(f, "unknown binding target {id:?}"),
            BuildError::UnknownConverter(id) => write!(f, "unknown converter {id:?}"),
            BuildError::EmptyTree => f.write_str("markup root could not be built"),
            BuildError::Reflect(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Reflect(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReflectError> for BuildError {
    fn from(err: ReflectError) -> Self {
        BuildError::Reflect(err)
    }
}
