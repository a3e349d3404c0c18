use std::fmt;
use std::str::FromStr;

use crate::style::StyleParseError;

/// 8-bit RGB color.
///
/// Attribute grammar: a palette name (`red`, `green`, `blue`, `white`,
/// `black`, `gray`, `pink`, `yellow`, `violet`) or `r,g,b` with each
/// channel clamped into 0–255. The canonical string form is always the
/// numeric `r,g,b` triple.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const VIOLET: Color = Color::rgb(238, 130, 238);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn named(s: &str) -> Option<Color> {
        Some(match s {
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "white" => Color::WHITE,
            "black" => Color::BLACK,
            "gray" => Color::GRAY,
            "pink" => Color::PINK,
            "yellow" => Color::YELLOW,
            "violet" => Color::VIOLET,
            _ => return None,
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

fn channel(s: &str) -> Result<u8, StyleParseError> {
    let v: i64 = s
        .trim()
        .parse()
        .map_err(|_| StyleParseError::new("color", s))?;
    Ok(v.clamp(0, 255) as u8)
}

impl FromStr for Color {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(c) = Color::named(s) {
            return Ok(c);
        }
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(StyleParseError::new("color", s));
        }
        Ok(Color::rgb(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Color {
        s.parse().unwrap()
    }

    #[test]
    fn named_palette() {
        assert_eq!(c("red"), Color::RED);
        assert_eq!(c("violet"), Color::rgb(238, 130, 238));
    }

    #[test]
    fn numeric_triple() {
        assert_eq!(c("12, 34,56"), Color::rgb(12, 34, 56));
    }

    #[test]
    fn channels_clamp() {
        assert_eq!(c("300,-5,255"), Color::rgb(255, 0, 255));
    }

    #[test]
    fn canonical_round_trip() {
        let col = c("yellow");
        assert_eq!(col.to_string(), "255,255,0");
        assert_eq!(c(&col.to_string()), col);
    }

    #[test]
    fn rejects_garbage() {
        assert!("chartreuse".parse::<Color>().is_err());
        assert!("1,2".parse::<Color>().is_err());
        assert!("a,b,c".parse::<Color>().is_err());
    }
}
