use crate::error::ReflectError;
use crate::value::{Kind, Value};

// ── DualVar ───────────────────────────────────────────────────────────────

/// Two-slot typed state for a converter: the "from" value and the "to"
/// value. Stateful converters (interpolation, reverse lookup) need both
/// sides of the conversion in view, not just the one being written.
#[derive(Debug, Clone, PartialEq)]
pub struct DualVar {
    pub from: Value,
    pub to: Value,
}

impl DualVar {
    pub fn new(from: Kind, to: Kind) -> Self {
        Self {
            from: Value::default_for(from),
            to: Value::default_for(to),
        }
    }
}

// ── Converter ─────────────────────────────────────────────────────────────

/// Bidirectional value transform between two typed endpoints.
///
/// `apply(state, true)` reads the "from" slot and writes the "to" slot;
/// `apply(state, false)` is the mirror. Used without dual-state context,
/// [`convert_text`](Converter::convert_text) runs a single-shot transform
/// at the canonical string level.
pub trait Converter {
    fn from_kind(&self) -> Kind;
    fn to_kind(&self) -> Kind;

    fn apply(&self, state: &mut DualVar, forward: bool) -> Result<(), ReflectError>;

    /// A fresh dual variable sized for this converter's two kinds.
    fn make_state(&self) -> DualVar {
        DualVar::new(self.from_kind(), self.to_kind())
    }

    /// Single-shot string-level transform for callers without dual state.
    fn convert_text(&self, input: &str, forward: bool) -> Result<String, ReflectError> {
        let mut state = self.make_state();
        if forward {
            state.from = Value::parse(self.from_kind(), input)?;
        } else {
            state.to = Value::parse(self.to_kind(), input)?;
        }
        self.apply(&mut state, forward)?;
        let out = if forward { &state.to } else { &state.from };
        out.format()
    }
}

// ── NumericCast ───────────────────────────────────────────────────────────

fn numeric(value: &Value) -> Result<f64, ReflectError> {
    match *value {
        Value::Int(v) => Ok(v as f64),
        Value::Float(v) => Ok(v as f64),
        ref other => Err(ReflectError::NotNumeric(other.kind())),
    }
}

fn renumber(kind: Kind, v: f64) -> Result<Value, ReflectError> {
    match kind {
        Kind::Int => Ok(Value::Int(v as i64)),
        Kind::Float => Ok(Value::Float(v as f32)),
        other => Err(ReflectError::NotNumeric(other)),
    }
}

/// Identity / numeric cast between `int` and `float`, both directions.
#[derive(Debug)]
pub struct NumericCast {
    from: Kind,
    to: Kind,
}

impl NumericCast {
    pub fn new(from: Kind, to: Kind) -> Result<Self, ReflectError> {
        for kind in [from, to] {
            if !matches!(kind, Kind::Int | Kind::Float) {
                return Err(ReflectError::NotNumeric(kind));
            }
        }
        Ok(Self { from, to })
    }
}

impl Converter for NumericCast {
    fn from_kind(&self) -> Kind {
        self.from
    }

    fn to_kind(&self) -> Kind {
        self.to
    }

    fn apply(&self, state: &mut DualVar, forward: bool) -> Result<(), ReflectError> {
        if forward {
            state.to = renumber(self.to, numeric(&state.from)?)?;
        } else {
            state.from = renumber(self.from, numeric(&state.to)?)?;
        }
        Ok(())
    }
}

// ── LookupTable ───────────────────────────────────────────────────────────

/// Interpolating lookup-table converter over an ordered bidirectional
/// key↔value mapping.
///
/// A probe not exactly present in the table is linearly interpolated
/// between the two bracketing entries; probes below the lowest key clamp
/// to the lowest entry, above the highest to the highest. The reverse
/// direction interpolates over the value side of the same table.
#[derive(Debug)]
pub struct LookupTable {
    by_key: Vec<(f32, f32)>,
    by_value: Vec<(f32, f32)>,
}

impl LookupTable {
    pub fn new(entries: impl IntoIterator<Item = (f32, f32)>) -> Result<Self, ReflectError> {
        let mut by_key: Vec<(f32, f32)> = entries.into_iter().collect();
        if by_key.is_empty() {
            return Err(ReflectError::EmptyTable);
        }
        by_key.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut by_value: Vec<(f32, f32)> = by_key.iter().map(|&(k, v)| (v, k)).collect();
        by_value.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { by_key, by_value })
    }

    fn interpolate(pairs: &[(f32, f32)], probe: f32) -> f32 {
        let (first, last) = (pairs[0], pairs[pairs.len() - 1]);
        if probe < first.0 {
            return first.1;
        }
        if probe > last.0 {
            return last.1;
        }
        let mut i = 0;
        while i + 1 < pairs.len() && pairs[i + 1].0 < probe {
            i += 1;
        }
        let (k0, v0) = pairs[i];
        let (k1, v1) = pairs[(i + 1).min(pairs.len() - 1)];
        // Degenerate bracket (single-entry table): t stays the raw probe.
        // Historical file-format quirk, kept as-is; v1 == v0 collapses the
        // result to v0 regardless.
        let t = if (k1 - k0).abs() > f32::EPSILON {
            (probe - k0) / (k1 - k0)
        } else {
            probe
        };
        v0 + t * (v1 - v0)
    }
}

impl Converter for LookupTable {
    fn from_kind(&self) -> Kind {
        Kind::Float
    }

    fn to_kind(&self) -> Kind {
        Kind::Float
    }

    fn apply(&self, state: &mut DualVar, forward: bool) -> Result<(), ReflectError> {
        if forward {
            let probe = state.from.as_float()?;
            state.to = Value::Float(Self::interpolate(&self.by_key, probe));
        } else {
            let probe = state.to.as_float()?;
            state.from = Value::Float(Self::interpolate(&self.by_value, probe));
        }
        Ok(())
    }
}
