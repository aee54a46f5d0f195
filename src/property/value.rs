//! Typed property values.
//!
//! A [`Value`] is whatever an editor stored into a property slot. The type
//! tag on a lookup ([`PropertyType`]) says what an editor *should* store, but
//! nothing here enforces it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type tag of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Integer,
    Float,
    Boolean,
    String,
    Color,
    Array,
}

/// Errors from parsing values out of text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid hex color `{0}`: expected #rrggbb or #rrggbbaa")]
    InvalidHexColor(String),
}

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(text: &str) -> Result<Self, ValueError> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let invalid = || ValueError::InvalidHexColor(text.to_owned());
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| -> Result<f64, ValueError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|c| f64::from(c) / 255.0)
                .map_err(|_| invalid())
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            c(self.r),
            c(self.g),
            c(self.b),
            c(self.a)
        )
    }

    /// Channel-wise comparison by bit pattern. Unlike `==`, a NaN channel
    /// matches itself.
    pub fn same_as(&self, other: &Rgba) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .zip([other.r, other.g, other.b, other.a])
            .all(|(x, y)| x.to_bits() == y.to_bits())
    }
}

/// A property value. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Color(Rgba),
    Array(Vec<Value>),
}

impl Value {
    /// Convenience constructor for [`Value::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// The type tag this value would satisfy.
    pub fn value_type(&self) -> PropertyType {
        match self {
            Value::Integer(_) => PropertyType::Integer,
            Value::Float(_) => PropertyType::Float,
            Value::Boolean(_) => PropertyType::Boolean,
            Value::Text(_) => PropertyType::String,
            Value::Color(_) => PropertyType::Color,
            Value::Array(_) => PropertyType::Array,
        }
    }

    /// Whether `other` is the same value. Floats, color channels included,
    /// compare by bit pattern: `NaN` matches an identical `NaN`, while `0.0`
    /// and `-0.0` differ.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
            (Value::Color(x), Value::Color(y)) => x.same_as(y),
            (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x.same_as(y))
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Color(c) => f.write_str(&c.to_hex()),
            Value::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Rgba> for Value {
    fn from(v: Rgba) -> Self {
        Value::Color(v)
    }
}
