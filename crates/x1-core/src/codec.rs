// ── Wire value codec ──
//
// The controller speaks strings ("1", "21.5") for every data point. This
// module turns that text into typed values and back, per value kind. Nothing
// is clamped or coerced: a value either converts exactly or fails with a
// named `CodecError`.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};
use x1_api::WireValue;

use crate::error::CodecError;

// ── Kinds ────────────────────────────────────────────────────────────

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// The conventional 0–100 percentage range.
    pub const PERCENT: Self = Self::new(0.0, 100.0);
    /// Relative adjustment, e.g. dimmer shift.
    pub const SIGNED_PERCENT: Self = Self::new(-100.0, 100.0);
    /// KNX DPT 9 temperature range in °C.
    pub const TEMPERATURE: Self = Self::new(-273.0, 670_760.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn check(self, value: f64) -> Result<f64, CodecError> {
        if value < self.min || value > self.max {
            return Err(CodecError::Range {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

const INTEGER: Bounds = Bounds::new(i32::MIN as f64, i32::MAX as f64);
const DWORD: Bounds = Bounds::new(0.0, u32::MAX as f64);
const BYTE: Bounds = Bounds::new(0.0, 255.0);

/// How a data point's wire text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// `"0"` / `"1"`.
    Binary,
    /// Percentage within the given bounds (0–100 unless the point says otherwise).
    Percent(Bounds),
    /// Signed 32-bit integer.
    Integer,
    /// Unsigned 32-bit integer.
    DWord,
    /// 0–255.
    Byte,
    /// Finite float, optionally bounded.
    Float(Option<Bounds>),
    /// Finite float within the KNX temperature range.
    Temperature,
    /// UTF-8 passthrough.
    Text,
    /// HVAC operating mode (DPT 20.102).
    HvacMode,
    /// Fan-coil controller mode (DPT 20.105).
    FanCoilMode,
    /// Scene number 1–64.
    Scene,
}

impl ValueKind {
    pub const PERCENT: Self = Self::Percent(Bounds::PERCENT);

    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Percent(_) => "percent",
            Self::Integer => "integer",
            Self::DWord => "dword",
            Self::Byte => "byte",
            Self::Float(_) => "float",
            Self::Temperature => "temperature",
            Self::Text => "text",
            Self::HvacMode => "HVAC mode",
            Self::FanCoilMode => "fan-coil mode",
            Self::Scene => "scene",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Enumerations ─────────────────────────────────────────────────────

/// HVAC operating mode, KNX DPT 20.102.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[repr(u8)]
pub enum HvacMode {
    Auto = 0,
    Comfort = 1,
    Standby = 2,
    Economy = 3,
    BuildingProtection = 4,
}

/// Fan-coil controller mode, KNX DPT 20.105.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[repr(u8)]
pub enum FanCoilMode {
    Auto = 0,
    Heat = 1,
    MorningWarmup = 2,
    Cool = 3,
    NightPurge = 4,
    Precool = 5,
    Off = 6,
    Test = 7,
    EmergencyHeat = 8,
    FanOnly = 9,
}

/// A scene number in 1–64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneIndex(u8);

impl SceneIndex {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 64;

    pub fn new(n: u8) -> Result<Self, CodecError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(CodecError::UnknownEnumValue {
                kind: "scene",
                raw: n.to_string(),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SceneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Values ───────────────────────────────────────────────────────────

/// A typed data-point value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    HvacMode(HvacMode),
    FanCoilMode(FanCoilMode),
    Scene(SceneIndex),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::HvacMode(_) => "HVAC mode",
            Self::FanCoilMode(_) => "fan-coil mode",
            Self::Scene(_) => "scene",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of integer and float values.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<HvacMode> for Value {
    fn from(m: HvacMode) -> Self {
        Self::HvacMode(m)
    }
}

impl From<FanCoilMode> for Value {
    fn from(m: FanCoilMode) -> Self {
        Self::FanCoilMode(m)
    }
}

impl From<SceneIndex> for Value {
    fn from(s: SceneIndex) -> Self {
        Self::Scene(s)
    }
}

// ── Decode ───────────────────────────────────────────────────────────

/// Decode wire text into a typed value of `kind`.
pub fn decode(raw: &str, kind: ValueKind) -> Result<Value, CodecError> {
    match kind {
        ValueKind::Binary => match raw {
            "0" => Ok(Value::Bool(false)),
            "1" => Ok(Value::Bool(true)),
            _ => Err(decode_error(kind, raw)),
        },
        ValueKind::Percent(bounds) => Ok(Value::Float(bounds.check(parse_number(raw, kind)?)?)),
        ValueKind::Integer => parse_integral(raw, kind, INTEGER).map(Value::Int),
        ValueKind::DWord => parse_integral(raw, kind, DWORD).map(Value::Int),
        ValueKind::Byte => parse_integral(raw, kind, BYTE).map(Value::Int),
        ValueKind::Float(bounds) => {
            let v = parse_number(raw, kind)?;
            match bounds {
                Some(b) => Ok(Value::Float(b.check(v)?)),
                None => Ok(Value::Float(v)),
            }
        }
        ValueKind::Temperature => Ok(Value::Float(
            Bounds::TEMPERATURE.check(parse_number(raw, kind)?)?,
        )),
        ValueKind::Text => Ok(Value::Text(raw.to_owned())),
        ValueKind::HvacMode => {
            let n = parse_member(raw, kind)?;
            HvacMode::from_repr(n)
                .map(Value::HvacMode)
                .ok_or_else(|| unknown_member(kind, raw))
        }
        ValueKind::FanCoilMode => {
            let n = parse_member(raw, kind)?;
            FanCoilMode::from_repr(n)
                .map(Value::FanCoilMode)
                .ok_or_else(|| unknown_member(kind, raw))
        }
        ValueKind::Scene => {
            let n = parse_member(raw, kind)?;
            SceneIndex::new(n)
                .map(Value::Scene)
                .map_err(|_| unknown_member(kind, raw))
        }
    }
}

fn decode_error(kind: ValueKind, raw: &str) -> CodecError {
    CodecError::Decode {
        kind: kind.name(),
        raw: raw.to_owned(),
    }
}

fn unknown_member(kind: ValueKind, raw: &str) -> CodecError {
    CodecError::UnknownEnumValue {
        kind: kind.name(),
        raw: raw.to_owned(),
    }
}

/// Finite number or `Decode`.
fn parse_number(raw: &str, kind: ValueKind) -> Result<f64, CodecError> {
    let v: f64 = raw.parse().map_err(|_| decode_error(kind, raw))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(decode_error(kind, raw))
    }
}

/// Integral number within `bounds`. Fractional input is a decode error.
#[allow(clippy::cast_possible_truncation)]
fn parse_integral(raw: &str, kind: ValueKind, bounds: Bounds) -> Result<i64, CodecError> {
    let v = parse_number(raw, kind)?;
    if v.fract() != 0.0 {
        return Err(decode_error(kind, raw));
    }
    Ok(bounds.check(v)? as i64)
}

/// Integral enumeration member candidate. Numbers outside `u8` cannot be
/// members of any enumeration here.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_member(raw: &str, kind: ValueKind) -> Result<u8, CodecError> {
    let v = parse_number(raw, kind)?;
    if v.fract() != 0.0 {
        return Err(decode_error(kind, raw));
    }
    if !(0.0..=255.0).contains(&v) {
        return Err(unknown_member(kind, raw));
    }
    Ok(v as u8)
}

// ── Encode ───────────────────────────────────────────────────────────

/// Encode a typed value for a data point of `kind`.
///
/// Numbers are written in their shortest form; integral floats carry no
/// fractional part (`50.0` → `"50"`).
pub fn encode(value: &Value, kind: ValueKind) -> Result<WireValue, CodecError> {
    let text = match kind {
        ValueKind::Binary => match value {
            Value::Bool(true) => "1".to_owned(),
            Value::Bool(false) => "0".to_owned(),
            other => return Err(mismatch(kind, other)),
        },
        ValueKind::Percent(bounds) => format_number(bounds.check(numeric(value, kind)?)?),
        ValueKind::Integer => format_number(integral(value, kind, INTEGER)?),
        ValueKind::DWord => format_number(integral(value, kind, DWORD)?),
        ValueKind::Byte => format_number(integral(value, kind, BYTE)?),
        ValueKind::Float(bounds) => {
            let v = numeric(value, kind)?;
            format_number(match bounds {
                Some(b) => b.check(v)?,
                None => v,
            })
        }
        ValueKind::Temperature => format_number(Bounds::TEMPERATURE.check(numeric(value, kind)?)?),
        ValueKind::Text => match value {
            Value::Text(s) => s.clone(),
            other => return Err(mismatch(kind, other)),
        },
        ValueKind::HvacMode => match value {
            Value::HvacMode(m) => (*m as u8).to_string(),
            Value::Int(_) => member_from_int(value, kind, |n| HvacMode::from_repr(n).is_some())?,
            other => return Err(mismatch(kind, other)),
        },
        ValueKind::FanCoilMode => match value {
            Value::FanCoilMode(m) => (*m as u8).to_string(),
            Value::Int(_) => {
                member_from_int(value, kind, |n| FanCoilMode::from_repr(n).is_some())?
            }
            other => return Err(mismatch(kind, other)),
        },
        ValueKind::Scene => match value {
            Value::Scene(s) => s.to_string(),
            Value::Int(_) => member_from_int(value, kind, |n| SceneIndex::new(n).is_ok())?,
            other => return Err(mismatch(kind, other)),
        },
    };
    Ok(WireValue::Text(text))
}

fn mismatch(kind: ValueKind, value: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected: kind.name(),
        got: value.type_name(),
    }
}

fn numeric(value: &Value, kind: ValueKind) -> Result<f64, CodecError> {
    let v = value.as_f64().ok_or_else(|| mismatch(kind, value))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(decode_error(kind, &v.to_string()))
    }
}

fn integral(value: &Value, kind: ValueKind, bounds: Bounds) -> Result<f64, CodecError> {
    let v = numeric(value, kind)?;
    if v.fract() != 0.0 {
        return Err(decode_error(kind, &v.to_string()));
    }
    bounds.check(v)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn member_from_int(
    value: &Value,
    kind: ValueKind,
    is_member: impl Fn(u8) -> bool,
) -> Result<String, CodecError> {
    let n = value.as_i64().unwrap_or(-1);
    if (0..=255).contains(&n) && is_member(n as u8) {
        Ok(n.to_string())
    } else {
        Err(unknown_member(kind, &n.to_string()))
    }
}

fn format_number(v: f64) -> String {
    // `-0` would otherwise print with its sign.
    if v == 0.0 { "0".to_owned() } else { v.to_string() }
}
