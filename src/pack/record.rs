use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::{format::Format, value::Value};

/// One record decoded from a packed block.
///
/// Holds one `Value::Seq` per field, in format order.
#[derive(Debug, Clone)]
pub struct Record {
    format: Arc<Format>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(format: Arc<Format>, values: Vec<Value>) -> Self {
        debug_assert_eq!(format.fields().len(), values.len());
        Self { format, values }
    }

    pub fn format(&self) -> &Arc<Format> {
        &self.format
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.format.index_of(name).map(|i| &self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.format
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// The record as a host value, one nested sequence per field.
    pub fn into_value(self) -> Value {
        Value::Seq(self.values)
    }
}

impl Index<usize> for Record {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format && self.values == other.values
    }
}

/// Compares against a host value in either call shape accepted by packing:
/// one sequence per field, or the bare field value for single-field formats.
impl PartialEq<Value> for Record {
    fn eq(&self, other: &Value) -> bool {
        match other.as_seq() {
            Some(items) if items == self.values.as_slice() => true,
            _ => self.values.len() == 1 && self.values[0] == *other,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("V(")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
