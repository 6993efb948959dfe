//! Module: value
//! Responsibility: the closed cell-value model crossing the data-source boundary.
//! Does not own: predicate construction, shaping, or wire envelopes.
//! Boundary: sources produce `Value`s; the adapter and shaper consume them.

mod compare;


use serde_json::{Number, Value as Json};
use std::fmt;

pub use compare::canonical_cmp;

///
/// Value
///
/// Cell value as read from a data source. Closed set: anything a source
/// exposes must be lowered into one of these variants before it reaches the
/// adapter or shaper.
///
/// None → the field is absent or SQL NULL; renders as the empty string.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Render the value the way a grid cell displays it.
    ///
    /// Lists join their elements with `", "`, which doubles as the fallback
    /// rendering for to-many relation cells.
    #[must_use]
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    /// Case-insensitive containment over the displayed form.
    ///
    /// `needle` must already be casefolded by the caller; the haystack is
    /// folded here. Used by in-memory predicate evaluation.
    #[must_use]
    pub fn contains_casefolded(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        self.to_display_string().to_lowercase().contains(needle)
    }

    /// Lossless conversion into a wire-serializable JSON value.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::None => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::Number((*n).into()),
            Self::Uint(n) => Json::Number((*n).into()),
            Self::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Self::Text(s) => Json::String(s.clone()),
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Numeric reading for cross-width comparison; `None` when not numeric.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Uint(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
