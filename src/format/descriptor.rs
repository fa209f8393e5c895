use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    error::{FormatError, PackError},
    format::{ElementType, cache},
    pack::{self, Record},
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub element_type: ElementType,
    pub count: usize,
    pub offset: usize,
}

impl Field {
    pub fn size(&self) -> usize {
        self.count * self.element_type.size()
    }

    /// Shape token as written in a format string, e.g. `3f`.
    pub fn shape(&self) -> String {
        format!("{}{}", self.count, self.element_type.as_char())
    }

    pub(crate) fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.size()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})[{}]", self.shape(), self.name)
    }
}

/// Immutable layout of one packed record.
///
/// Built by [`Format::parse`] and shared as `Arc<Format>`. Two formats are
/// equal when their field layouts are equal.
#[derive(Debug)]
pub struct Format {
    fields: SmallVec<[Field; 4]>,
    record_size: usize,
    by_name: HashMap<String, usize>,
}

impl Format {
    /// Parses `spec` through the process-wide format cache.
    pub fn parse(spec: &str) -> Result<Arc<Format>, FormatError> {
        cache::global().get_or_parse(spec)
    }

    /// Lays fields out in declaration order with no padding.
    ///
    /// Fails with [`FormatError::TooLarge`] when a field size or the running
    /// offset does not fit in `usize`.
    pub(crate) fn from_fields(
        fields: impl IntoIterator<Item = (String, ElementType, usize)>,
    ) -> Result<Self, FormatError> {
        let mut offset = 0usize;
        let mut by_name = HashMap::new();
        let mut laid_out = SmallVec::<[Field; 4]>::new();

        for (index, (name, element_type, count)) in fields.into_iter().enumerate() {
            let end = count
                .checked_mul(element_type.size())
                .and_then(|size| offset.checked_add(size))
                .ok_or_else(|| FormatError::TooLarge(name.clone()))?;
            by_name.entry(name.clone()).or_insert(index);
            laid_out.push(Field {
                name,
                element_type,
                count,
                offset,
            });
            offset = end;
        }

        Ok(Self {
            fields: laid_out,
            record_size: offset,
            by_name,
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// First field named `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn pack(&self, records: &[Value]) -> Result<Vec<u8>, PackError> {
        pack::pack_many(self, records)
    }

    pub fn pack_single(&self, record: &Value) -> Result<Vec<u8>, PackError> {
        pack::pack_one(self, record)
    }

    pub fn unpack(self: &Arc<Self>, bytes: &[u8], index: usize) -> Result<Record, PackError> {
        pack::unpack_one(self, bytes, index)
    }
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Format {}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in &self.fields {
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// Anything a buffer can take its format from.
///
/// Passing an existing `Arc<Format>` hands back the same descriptor.
pub trait IntoFormat {
    fn into_format(self) -> Result<Arc<Format>, FormatError>;
}

impl IntoFormat for &str {
    fn into_format(self) -> Result<Arc<Format>, FormatError> {
        Format::parse(self)
    }
}

impl IntoFormat for String {
    fn into_format(self) -> Result<Arc<Format>, FormatError> {
        Format::parse(&self)
    }
}

impl IntoFormat for &String {
    fn into_format(self) -> Result<Arc<Format>, FormatError> {
        Format::parse(self)
    }
}

impl IntoFormat for Arc<Format> {
    fn into_format(self) -> Result<Arc<Format>, FormatError> {
        Ok(self)
    }
}

impl IntoFormat for &Arc<Format> {
    fn into_format(self) -> Result<Arc<Format>, FormatError> {
        Ok(Arc::clone(self))
    }
}
