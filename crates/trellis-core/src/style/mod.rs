//! Declarative style types and their attribute-string grammars.
//!
//! Each type carries `FromStr` (the grammar the markup front-end feeds us,
//! one attribute value at a time) and a canonical `Display` form that
//! round-trips through the same grammar.

mod margin;
mod size;

pub use margin::Margin;
pub use size::{Size, SizePair};

use std::fmt;
use std::str::FromStr;

// ── StyleParseError ───────────────────────────────────────────────────────

/// A malformed attribute string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleParseError {
    /// Grammar name (`size`, `margin`, `color`, …).
    pub grammar: &'static str,
    pub input: String,
}

impl StyleParseError {
    pub(crate) fn new(grammar: &'static str, input: impl Into<String>) -> Self {
        Self { grammar, input: input.into() }
    }
}

impl fmt::Display for StyleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value: {:?}", self.grammar, self.input)
    }
}

impl std::error::Error for StyleParseError {}

// ── Orientation ───────────────────────────────────────────────────────────

/// Stacking axis of a container.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children stack top to bottom (default).
    #[default]
    Vertical,
    /// Children stack left to right.
    Horizontal,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        })
    }
}

impl FromStr for Orientation {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(StyleParseError::new("orientation", other)),
        }
    }
}

// ── Alignment ─────────────────────────────────────────────────────────────

/// Horizontal content alignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    /// Default.
    #[default]
    Center,
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        })
    }
}

impl FromStr for Alignment {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(StyleParseError::new("alignment", other)),
        }
    }
}

#[cfg(test)]
mod grammar_tests {
    use super::*;

    #[test] fn orientation_values() {
        assert_eq!("vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!("horizontal".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test] fn orientation_default_is_vertical() {
        assert_eq!(Orientation::default(), Orientation::Vertical);
    }

    #[test] fn alignment_values() {
        assert_eq!("left".parse::<Alignment>().unwrap(), Alignment::Left);
        assert_eq!("center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!("right".parse::<Alignment>().unwrap(), Alignment::Right);
        assert!("top".parse::<Alignment>().is_err());
    }

    #[test] fn alignment_default_is_center() {
        assert_eq!(Alignment::default(), Alignment::Center);
    }
}
