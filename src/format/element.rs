use std::fmt;

use crate::error::FormatError;

/// Scalar type of a field, keyed by its format character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    F64,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::F32,
        ElementType::F64,
        ElementType::I8,
        ElementType::U8,
        ElementType::I16,
        ElementType::U16,
        ElementType::I32,
        ElementType::U32,
    ];

    pub fn from_char(c: char) -> Result<Self, FormatError> {
        Ok(match c {
            'f' => ElementType::F32,
            'd' => ElementType::F64,
            'b' => ElementType::I8,
            'B' => ElementType::U8,
            's' => ElementType::I16,
            'S' => ElementType::U16,
            'i' => ElementType::I32,
            'I' => ElementType::U32,
            other => return Err(FormatError::UnknownType(other)),
        })
    }

    pub fn as_char(self) -> char {
        match self {
            ElementType::F32 => 'f',
            ElementType::F64 => 'd',
            ElementType::I8 => 'b',
            ElementType::U8 => 'B',
            ElementType::I16 => 's',
            ElementType::U16 => 'S',
            ElementType::I32 => 'i',
            ElementType::U32 => 'I',
        }
    }

    pub fn size(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::F32 | ElementType::I32 | ElementType::U32 => 4,
            ElementType::F64 => 8,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Matching `GL_*` type enum, as passed to `glVertexAttribPointer`.
    pub fn gl_type(self) -> u32 {
        match self {
            ElementType::I8 => 0x1400,
            ElementType::U8 => 0x1401,
            ElementType::I16 => 0x1402,
            ElementType::U16 => 0x1403,
            ElementType::I32 => 0x1404,
            ElementType::U32 => 0x1405,
            ElementType::F32 => 0x1406,
            ElementType::F64 => 0x140A,
        }
    }

    /// Inclusive integer range, `None` for float types.
    pub(crate) fn int_range(self) -> Option<(i64, i64)> {
        match self {
            ElementType::I8 => Some((i8::MIN.into(), i8::MAX.into())),
            ElementType::U8 => Some((0, u8::MAX.into())),
            ElementType::I16 => Some((i16::MIN.into(), i16::MAX.into())),
            ElementType::U16 => Some((0, u16::MAX.into())),
            ElementType::I32 => Some((i32::MIN.into(), i32::MAX.into())),
            ElementType::U32 => Some((0, u32::MAX.into())),
            ElementType::F32 | ElementType::F64 => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
            ElementType::I8 => "int8",
            ElementType::U8 => "uint8",
            ElementType::I16 => "int16",
            ElementType::U16 => "uint16",
            ElementType::I32 => "int32",
            ElementType::U32 => "uint32",
        };
        f.write_str(s)
    }
}
