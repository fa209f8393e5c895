use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attributes, `GL_ARRAY_BUFFER`.
    Array,
    /// Vertex indices, `GL_ELEMENT_ARRAY_BUFFER`.
    Element,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => 0x8892,
            BufferTarget::Element => 0x8893,
        }
    }
}

impl fmt::Display for BufferTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BufferTarget::Array => "Array",
            BufferTarget::Element => "Element",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::StreamDraw => 0x88E0,
            BufferUsage::StaticDraw => 0x88E4,
            BufferUsage::DynamicDraw => 0x88E8,
        }
    }
}

/// Initial contents handed to [`BufferBackend::buffer_data`](super::BufferBackend::buffer_data).
#[derive(Debug, Clone, Copy)]
pub enum BufferData<'a> {
    Bytes(&'a [u8]),
    Zeroed(usize),
}

impl BufferData<'_> {
    pub fn len(&self) -> usize {
        match self {
            BufferData::Bytes(bytes) => bytes.len(),
            BufferData::Zeroed(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
