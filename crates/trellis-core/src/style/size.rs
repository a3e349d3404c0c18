use std::fmt;
use std::str::FromStr;

use super::StyleParseError;

// ── Size ──────────────────────────────────────────────────────────────────

/// Declared extent on one axis.
///
/// Grammar: `N` (pixel count), `N%` (percentage of parent), `*` (greedy —
/// take a full share of leftover space), `auto` (intrinsic content size).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Size {
    Px(f32),
    Percent(f32),
    Star,
    Auto,
}

impl Size {
    /// True for `*` and percentages — sizes that claim a share of leftover
    /// space on a stacking axis rather than a fixed pixel count.
    #[inline]
    pub fn is_greedy(self) -> bool {
        matches!(self, Size::Star | Size::Percent(_))
    }

    /// Share weight on a stacking axis: `*` counts as a whole share,
    /// `N%` as N/100. Fixed sizes have no share.
    #[inline]
    pub fn share(self) -> f32 {
        match self {
            Size::Star => 1.0,
            Size::Percent(p) => p / 100.0,
            Size::Px(_) | Size::Auto => 0.0,
        }
    }

    /// Resolve against a parent extent, using `intrinsic` for `auto`.
    /// Greedy sizes fill the parent here; proportional sharing between
    /// siblings is the stacking container's job.
    #[inline]
    pub fn resolve(self, parent: f32, intrinsic: f32) -> f32 {
        match self {
            Size::Px(v) => v,
            Size::Percent(p) => parent * p / 100.0,
            Size::Star => parent,
            Size::Auto => intrinsic,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::Auto
    }
}

fn fmt_px(f: &mut fmt::Formatter<'_>, v: f32) -> fmt::Result {
    if v.fract() == 0.0 {
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Size::Px(v) => fmt_px(f, v),
            Size::Percent(p) => {
                fmt_px(f, p)?;
                f.write_str("%")
            }
            Size::Star => f.write_str("*"),
            Size::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Size {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "*" => return Ok(Size::Star),
            "auto" => return Ok(Size::Auto),
            _ => {}
        }
        if let Some(pct) = s.strip_suffix('%') {
            let p: f32 = pct
                .trim()
                .parse()
                .map_err(|_| StyleParseError::new("size", s))?;
            return Ok(Size::Percent(p));
        }
        let v: f32 = s.parse().map_err(|_| StyleParseError::new("size", s))?;
        Ok(Size::Px(v))
    }
}

// ── SizePair ──────────────────────────────────────────────────────────────

/// Declared extent on both axes.
///
/// Grammar: `x,y` with each component a [`Size`]; a bare `auto` expands to
/// both axes auto; a bare `*` expands to both axes greedy.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SizePair {
    pub x: Size,
    pub y: Size,
}

impl SizePair {
    #[inline]
    pub const fn new(x: Size, y: Size) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn px(x: f32, y: f32) -> Self {
        Self { x: Size::Px(x), y: Size::Px(y) }
    }

    #[inline]
    pub const fn auto() -> Self {
        Self { x: Size::Auto, y: Size::Auto }
    }

    /// Extent on the given axis (x for `horizontal == true`).
    #[inline]
    pub fn axis(self, horizontal: bool) -> Size {
        if horizontal { self.x } else { self.y }
    }
}

impl fmt::Display for SizePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for SizePair {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "auto" => return Ok(SizePair::new(Size::Auto, Size::Auto)),
            "*" => return Ok(SizePair::new(Size::Star, Size::Star)),
            _ => {}
        }
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| StyleParseError::new("size-pair", s))?;
        Ok(SizePair::new(x.parse()?, y.parse()?))
    }
}

#[cfg(test)]
mod grammar_tests {
    use super::*;

    fn size(s: &str) -> Size { s.parse().unwrap() }
    fn pair(s: &str) -> SizePair { s.parse().unwrap() }

    // ── size ──────────────────────────────────────────────────────────────

    #[test] fn pixels() { assert_eq!(size("120"), Size::Px(120.0)); }
    #[test] fn percent() { assert_eq!(size("45%"), Size::Percent(45.0)); }
    #[test] fn star() { assert_eq!(size("*"), Size::Star); }
    #[test] fn auto() { assert_eq!(size("auto"), Size::Auto); }
    #[test] fn bad_size() { assert!("12px".parse::<Size>().is_err()); }

    #[test]
    fn size_round_trips() {
        for s in ["120", "45%", "*", "auto", "12.5"] {
            assert_eq!(size(s).to_string(), s);
        }
    }

    #[test]
    fn resolve_variants() {
        assert_eq!(Size::Px(30.0).resolve(200.0, 10.0), 30.0);
        assert_eq!(Size::Percent(25.0).resolve(200.0, 10.0), 50.0);
        assert_eq!(Size::Star.resolve(200.0, 10.0), 200.0);
        assert_eq!(Size::Auto.resolve(200.0, 10.0), 10.0);
    }

    // ── size-pair ─────────────────────────────────────────────────────────

    #[test] fn pair_components() {
        assert_eq!(pair("30,40%"), SizePair::new(Size::Px(30.0), Size::Percent(40.0)));
    }
    #[test] fn bare_auto_expands() {
        assert_eq!(pair("auto"), SizePair::new(Size::Auto, Size::Auto));
    }
    #[test] fn bare_star_expands() {
        assert_eq!(pair("*"), SizePair::new(Size::Star, Size::Star));
    }
    #[test] fn bad_pair() { assert!("30".parse::<SizePair>().is_err()); }
}
