use trellis_reflect::BindingMode;

use crate::error::BuildError;

// ── MarkupNode ────────────────────────────────────────────────────────────

/// One node of the pre-parsed markup tree the builder consumes: an
/// element type name, ordered attributes, ordered children. The XML
/// front-end producing these lives outside this crate.
#[derive(Debug, Clone, Default)]
pub struct MarkupNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, node: MarkupNode) -> Self {
        self.children.push(node);
        self
    }
}

// ── BindSpec ──────────────────────────────────────────────────────────────

/// A parsed `{bind …}` attribute value.
///
/// Grammar: `{bind <target>[.<path>…][, converter=<id>][, mode=<m>]}`
/// with `<m>` one of `oneway` (default), `twoway`, `onetime`. An empty
/// path binds to the target's property of the same name as the bound
/// attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct BindSpec {
    pub target: String,
    pub path: Vec<String>,
    pub converter: Option<String>,
    pub mode: BindingMode,
}

impl BindSpec {
    /// `None` for plain attribute values; `Some(Err)` when the value is a
    /// binding reference but malformed.
    pub fn parse(raw: &str) -> Option<Result<BindSpec, BuildError>> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('{')?.strip_suffix('}')?.trim();
        let body = body.strip_prefix("bind")?;
        if !body.is_empty() && !body.starts_with(char::is_whitespace) {
            // `{bindfoo}` is not a binding keyword.
            return None;
        }
        Some(Self::parse_body(body, raw))
    }

    fn parse_body(body: &str, raw: &str) -> Result<BindSpec, BuildError> {
        let bad = || BuildError::BadBindRef(raw.trim().to_owned());
        let mut parts = body.split(',').map(str::trim);

        let reference = parts.next().filter(|s| !s.is_empty()).ok_or_else(bad)?;
        let mut segments = reference.split('.').map(str::trim);
        let target = segments.next().filter(|s| !s.is_empty()).ok_or_else(bad)?.to_owned();
        let mut path = Vec::new();
        for segment in segments {
            if segment.is_empty() {
                return Err(bad());
            }
            path.push(segment.to_owned());
        }

        let mut converter = None;
        let mut mode = BindingMode::default();
        for option in parts {
            let (key, value) = option.split_once('=').ok_or_else(bad)?;
            match key.trim() {
                "converter" => converter = Some(value.trim().to_owned()),
                "mode" => mode = value.parse().map_err(|_| bad())?,
                _ => return Err(bad()),
            }
        }

        Ok(BindSpec { target, path, converter, mode })
    }
}
