use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Host-side value handed to the packing engine.
///
/// Records are nested sequences: a record is a `Seq` of fields and every field
/// is a `Seq` of scalars. Integers and floats compare numerically, so
/// `Value::Int(1) == Value::Float(1.0)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Seq(Vec<Value>),
}

impl Value {
    pub fn seq(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    /// First element when `self` is a non-empty sequence.
    pub fn first(&self) -> Option<&Value> {
        self.as_seq().and_then(|items| items.first())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Int(v) => Some(v as f64),
            Value::Float(v) => Some(v),
            Value::Seq(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Seq(_), _) | (_, Value::Seq(_)) => false,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Seq(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v.into())
            }
        })*
    };
}

value_from_int!(i8, u8, i16, u16, i32, u32, i64);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::seq(items)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::seq(items)
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::seq(items.iter().cloned())
    }
}

macro_rules! value_from_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for Value {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Value::Seq(vec![$($name.into()),+])
            }
        }
    };
}

value_from_tuple!(A);
value_from_tuple!(A, B);
value_from_tuple!(A, B, C);
value_from_tuple!(A, B, C, D);
value_from_tuple!(A, B, C, D, E);
value_from_tuple!(A, B, C, D, E, F);

/// Parses RON literals such as `((1, 2, 3), (4.5, 5, 6))`. Lists in brackets
/// and trailing commas are accepted as well.
impl FromStr for Value {
    type Err = ron::error::SpannedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ron::from_str(s)
    }
}
