use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format must be present")]
    Empty,

    #[error("format string is not valid: unexpected {unmatched:?} at byte {position}")]
    Malformed { position: usize, unmatched: String },

    #[error("unknown format character {0:?}")]
    UnknownType(char),

    #[error("\"{0}\" is not a valid field count")]
    InvalidCount(String),

    #[error("\"{0}\" is not a valid variable name")]
    InvalidName(String),

    #[error("field `{0}` does not fit in an addressable record")]
    TooLarge(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("no data to pack")]
    Empty,

    #[error("expected sequence with format \"{expected}\" for field `{field}`, found \"{found}\"")]
    Shape {
        field: String,
        expected: String,
        found: String,
    },

    #[error("expected a record of {expected} field(s), found \"{found}\"")]
    FieldCount { expected: usize, found: String },

    #[error("index \"{index}\" out of bound, buffer has a length of \"{len}\"")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("record size is {record_size} bytes but target type is {type_size} bytes")]
    RecordSize { record_size: usize, type_size: usize },
}

#[derive(Debug, Error)]
pub enum BufferError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("buffer target was not defined")]
    NoTarget,

    #[error("buffer does not support resizing: range holds {expected} record(s), got {found}")]
    Resize { expected: usize, found: usize },

    #[error("{len} record(s) of {record_size} bytes do not fit in an addressable buffer")]
    TooLarge { len: usize, record_size: usize },

    #[error("range {start}..{end} out of bound, buffer has a length of {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("buffer backend failure")]
    Backend(#[source] anyhow::Error),
}
