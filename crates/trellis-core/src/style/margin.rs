use std::fmt;
use std::str::FromStr;

use super::StyleParseError;

/// Outer spacing on all four sides.
///
/// Grammar: `n` (uniform), `n^` (left/right/bottom = n, top = 0 — the
/// top-exempt shorthand, preserved as-is from the original file format),
/// `left,top` (two-value), `left,top,right,bottom` (four-value).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Margin {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margin {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub const fn all(v: f32) -> Self {
        Self { left: v, top: v, right: v, bottom: v }
    }

    /// Total inset on the horizontal axis.
    #[inline]
    pub fn h(self) -> f32 {
        self.left + self.right
    }

    /// Total inset on the vertical axis.
    #[inline]
    pub fn v(self) -> f32 {
        self.top + self.bottom
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

fn component(grammar_input: &str, s: &str) -> Result<f32, StyleParseError> {
    s.trim()
        .parse()
        .map_err(|_| StyleParseError::new("margin", grammar_input))
}

impl FromStr for Margin {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(n) = s.strip_suffix('^') {
            let v = component(s, n)?;
            return Ok(Margin::new(v, 0.0, v, v));
        }
        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [n] => Ok(Margin::all(component(s, n)?)),
            [l, t] => Ok(Margin::new(component(s, l)?, component(s, t)?, 0.0, 0.0)),
            [l, t, r, b] => Ok(Margin::new(
                component(s, l)?,
                component(s, t)?,
                component(s, r)?,
                component(s, b)?,
            )),
            _ => Err(StyleParseError::new("margin", s)),
        }
    }
}

#[cfg(test)]
mod grammar_tests {
    use super::*;

    fn m(s: &str) -> Margin { s.parse().unwrap() }

    #[test] fn uniform() { assert_eq!(m("8"), Margin::all(8.0)); }
    #[test] fn two_value() { assert_eq!(m("4,6"), Margin::new(4.0, 6.0, 0.0, 0.0)); }
    #[test] fn four_value() { assert_eq!(m("1,2,3,4"), Margin::new(1.0, 2.0, 3.0, 4.0)); }
    #[test] fn top_exempt_shorthand() { assert_eq!(m("5^"), Margin::new(5.0, 0.0, 5.0, 5.0)); }
    #[test] fn bad_margin() { assert!("1,2,3".parse::<Margin>().is_err()); }

    #[test]
    fn canonical_round_trip() {
        let v = m("5^");
        assert_eq!(v.to_string(), "5,0,5,5");
        assert_eq!(m(&v.to_string()), v);
    }

    #[test]
    fn axis_totals() {
        let v = m("1,2,3,4");
        assert_eq!(v.h(), 4.0);
        assert_eq!(v.v(), 6.0);
    }
}
