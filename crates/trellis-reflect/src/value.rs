use std::fmt;
use std::rc::Rc;

use trellis_core::paint::Color;
use trellis_core::style::{Alignment, Margin, Orientation, Size, SizePair};

use crate::error::ReflectError;
use crate::property::BindRef;

// ── Kind ──────────────────────────────────────────────────────────────────

/// String-tagged type of a property or converter endpoint.
///
/// A property's kind is fixed for its lifetime; every kind except
/// [`Kind::Object`] has a documented attribute-string grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Float,
    Bool,
    Str,
    Size,
    SizePair,
    Color,
    Margin,
    Orientation,
    Alignment,
    /// A reference to another bindable object (multi-level binding hops).
    Object,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Str => "string",
            Kind::Size => "size",
            Kind::SizePair => "size-pair",
            Kind::Color => "color",
            Kind::Margin => "margin",
            Kind::Orientation => "orientation",
            Kind::Alignment => "alignment",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Value ─────────────────────────────────────────────────────────────────

/// A property value — one variant per [`Kind`].
///
/// Values cross type boundaries in their canonical string form
/// ([`Value::parse`] / [`Value::format`]); in-process code uses the typed
/// accessors (`as_int`, `as_float`, …).
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(String),
    Size(Size),
    SizePair(SizePair),
    Color(Color),
    Margin(Margin),
    Orientation(Orientation),
    Alignment(Alignment),
    Object(Option<BindRef>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Str(_) => Kind::Str,
            Value::Size(_) => Kind::Size,
            Value::SizePair(_) => Kind::SizePair,
            Value::Color(_) => Kind::Color,
            Value::Margin(_) => Kind::Margin,
            Value::Orientation(_) => Kind::Orientation,
            Value::Alignment(_) => Kind::Alignment,
            Value::Object(_) => Kind::Object,
        }
    }

    /// The zero value of a kind — used to seed fresh dual variables.
    pub fn default_for(kind: Kind) -> Value {
        match kind {
            Kind::Int => Value::Int(0),
            Kind::Float => Value::Float(0.0),
            Kind::Bool => Value::Bool(false),
            Kind::Str => Value::Str(String::new()),
            Kind::Size => Value::Size(Size::default()),
            Kind::SizePair => Value::SizePair(SizePair::default()),
            Kind::Color => Value::Color(Color::default()),
            Kind::Margin => Value::Margin(Margin::default()),
            Kind::Orientation => Value::Orientation(Orientation::default()),
            Kind::Alignment => Value::Alignment(Alignment::default()),
            Kind::Object => Value::Object(None),
        }
    }

    /// Parse the canonical string form of `kind`.
    pub fn parse(kind: Kind, input: &str) -> Result<Value, ReflectError> {
        let err = || ReflectError::Parse { kind, input: input.to_owned() };
        let input = input.trim();
        Ok(match kind {
            Kind::Int => Value::Int(input.parse().map_err(|_| err())?),
            Kind::Float => Value::Float(input.parse().map_err(|_| err())?),
            Kind::Bool => match input {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(err()),
            },
            Kind::Str => Value::Str(input.to_owned()),
            Kind::Size => Value::Size(input.parse().map_err(|_| err())?),
            Kind::SizePair => Value::SizePair(input.parse().map_err(|_| err())?),
            Kind::Color => Value::Color(input.parse().map_err(|_| err())?),
            Kind::Margin => Value::Margin(input.parse().map_err(|_| err())?),
            Kind::Orientation => Value::Orientation(input.parse().map_err(|_| err())?),
            Kind::Alignment => Value::Alignment(input.parse().map_err(|_| err())?),
            Kind::Object => return Err(ReflectError::NoStringForm(Kind::Object)),
        })
    }

    /// Canonical string form. Objects have none.
    pub fn format(&self) -> Result<String, ReflectError> {
        Ok(match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Str(v) => v.clone(),
            Value::Size(v) => v.to_string(),
            Value::SizePair(v) => v.to_string(),
            Value::Color(v) => v.to_string(),
            Value::Margin(v) => v.to_string(),
            Value::Orientation(v) => v.to_string(),
            Value::Alignment(v) => v.to_string(),
            Value::Object(_) => return Err(ReflectError::NoStringForm(Kind::Object)),
        })
    }

    fn mismatch(&self, expected: Kind) -> ReflectError {
        ReflectError::TypeMismatch { expected, found: self.kind() }
    }

    // ── typed accessors ───────────────────────────────────────────────────

    pub fn as_int(&self) -> Result<i64, ReflectError> {
        match *self {
            Value::Int(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Int)),
        }
    }

    pub fn as_float(&self) -> Result<f32, ReflectError> {
        match *self {
            Value::Float(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Float)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ReflectError> {
        match *self {
            Value::Bool(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Bool)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ReflectError> {
        match self {
            Value::Str(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Str)),
        }
    }

    pub fn as_size(&self) -> Result<Size, ReflectError> {
        match *self {
            Value::Size(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Size)),
        }
    }

    pub fn as_size_pair(&self) -> Result<SizePair, ReflectError> {
        match *self {
            Value::SizePair(v) => Ok(v),
            _ => Err(self.mismatch(Kind::SizePair)),
        }
    }

    pub fn as_color(&self) -> Result<Color, ReflectError> {
        match *self {
            Value::Color(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Color)),
        }
    }

    pub fn as_margin(&self) -> Result<Margin, ReflectError> {
        match *self {
            Value::Margin(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Margin)),
        }
    }

    pub fn as_orientation(&self) -> Result<Orientation, ReflectError> {
        match *self {
            Value::Orientation(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Orientation)),
        }
    }

    pub fn as_alignment(&self) -> Result<Alignment, ReflectError> {
        match *self {
            Value::Alignment(v) => Ok(v),
            _ => Err(self.mismatch(Kind::Alignment)),
        }
    }

    pub fn as_object(&self) -> Result<Option<BindRef>, ReflectError> {
        match self {
            Value::Object(v) => Ok(v.clone()),
            _ => Err(self.mismatch(Kind::Object)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(Some(_)) => f.write_str("Object(<live>)"),
            Value::Object(None) => f.write_str("Object(None)"),
            other => match other.format() {
                Ok(s) => write!(f, "{}({s})", other.kind()),
                Err(_) => f.write_str("<value>"),
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Size(a), Value::Size(b)) => a == b,
            (Value::SizePair(a), Value::SizePair(b)) => a == b,
            (Value::Color(a), Value::Color(b)) => a == b,
            (Value::Margin(a), Value::Margin(b)) => a == b,
            (Value::Orientation(a), Value::Orientation(b)) => a == b,
            (Value::Alignment(a), Value::Alignment(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => match (a, b) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse / format ────────────────────────────────────────────────────

    #[test]
    fn parse_each_grammar() {
        assert_eq!(Value::parse(Kind::Int, "42").unwrap(), Value::Int(42));
        assert_eq!(Value::parse(Kind::Float, "2.5").unwrap(), Value::Float(2.5));
        assert_eq!(Value::parse(Kind::Bool, "true").unwrap(), Value::Bool(true));
        assert_eq!(
            Value::parse(Kind::Size, "40%").unwrap(),
            Value::Size(Size::Percent(40.0))
        );
        assert_eq!(
            Value::parse(Kind::Color, "red").unwrap(),
            Value::Color(Color::RED)
        );
        assert_eq!(
            Value::parse(Kind::Margin, "3^").unwrap(),
            Value::Margin(Margin::new(3.0, 0.0, 3.0, 3.0))
        );
        assert_eq!(
            Value::parse(Kind::Orientation, "horizontal").unwrap(),
            Value::Orientation(Orientation::Horizontal)
        );
    }

    #[test]
    fn parse_failure_carries_kind_and_input() {
        let err = Value::parse(Kind::Int, "twelve").unwrap_err();
        assert_eq!(
            err,
            ReflectError::Parse { kind: Kind::Int, input: "twelve".into() }
        );
    }

    #[test]
    fn format_round_trips() {
        for (kind, text) in [
            (Kind::Int, "42"),
            (Kind::Float, "2.5"),
            (Kind::Bool, "false"),
            (Kind::Size, "40%"),
            (Kind::SizePair, "30,auto"),
            (Kind::Color, "255,0,0"),
            (Kind::Margin, "1,2,3,4"),
            (Kind::Orientation, "horizontal"),
            (Kind::Alignment, "right"),
        ] {
            let v = Value::parse(kind, text).unwrap();
            assert_eq!(v.format().unwrap(), text);
        }
    }

    #[test]
    fn objects_have_no_string_form() {
        assert!(Value::parse(Kind::Object, "x").is_err());
        assert_eq!(
            Value::Object(None).format().unwrap_err(),
            ReflectError::NoStringForm(Kind::Object)
        );
    }

    // ── typed accessors ───────────────────────────────────────────────────

    #[test]
    fn accessor_kind_mismatch() {
        let err = Value::Int(1).as_float().unwrap_err();
        assert_eq!(
            err,
            ReflectError::TypeMismatch { expected: Kind::Float, found: Kind::Int }
        );
    }

    #[test]
    fn default_values_match_kind() {
        for kind in [Kind::Int, Kind::Str, Kind::Margin, Kind::Object] {
            assert_eq!(Value::default_for(kind).kind(), kind);
        }
    }
}
