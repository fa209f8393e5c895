mod record;

use std::sync::Arc;

use bytemuck::Pod;

pub use record::Record;

use crate::{
    error::PackError,
    format::{ElementType, Field, Format},
    value::Value,
};

/// Packs `records` into one contiguous block of `records.len()` records.
///
/// Single-field formats accept the bare field value per record, so
/// `((1, 2, 3), (4, 5, 6))` packs the same as `(((1, 2, 3),), ((4, 5, 6),))`.
/// The call shape is decided once, from the first record.
pub fn pack_many(format: &Format, records: &[Value]) -> Result<Vec<u8>, PackError> {
    #[cfg(feature = "tracing")]
    let _span = tracy_client::span!("pack_many");

    let first = records.first().ok_or(PackError::Empty)?;
    let wrapped = is_wrapped(format, first);

    // Grown from the values written; record_size alone is not trusted for a
    // reservation.
    let mut out = Vec::new();
    for record in records {
        pack_into(&mut out, format, record, wrapped)?;
    }
    Ok(out)
}

/// Packs exactly one record. Same call shapes as [`pack_many`].
pub fn pack_one(format: &Format, record: &Value) -> Result<Vec<u8>, PackError> {
    let mut out = Vec::new();
    pack_into(&mut out, format, record, is_wrapped(format, record))?;
    Ok(out)
}

/// Copies plain-old-data records straight into a block. `T` must be exactly
/// one record wide; field types are not checked.
pub fn pack_pod<T: Pod>(format: &Format, items: &[T]) -> Result<Vec<u8>, PackError> {
    check_pod_size::<T>(format)?;
    if items.is_empty() {
        return Err(PackError::Empty);
    }
    Ok(bytemuck::cast_slice(items).to_vec())
}

/// Number of whole records in `bytes`. Trailing partial records are ignored.
pub fn record_count(format: &Format, bytes: &[u8]) -> usize {
    bytes.len() / format.record_size()
}

pub fn unpack_one(format: &Arc<Format>, bytes: &[u8], index: usize) -> Result<Record, PackError> {
    let len = record_count(format, bytes);
    if index >= len {
        return Err(PackError::IndexOutOfRange { index, len });
    }
    let size = format.record_size();
    Ok(decode(format, &bytes[index * size..(index + 1) * size]))
}

pub fn unpack_all<'a>(
    format: &'a Arc<Format>,
    bytes: &'a [u8],
) -> impl ExactSizeIterator<Item = Record> + 'a {
    bytes
        .chunks_exact(format.record_size())
        .map(move |chunk| decode(format, chunk))
}

/// Reads a block back as `T` values, one per record.
pub fn cast_records<T: Pod>(format: &Format, bytes: &[u8]) -> Result<Vec<T>, PackError> {
    check_pod_size::<T>(format)?;
    Ok(bytes
        .chunks_exact(format.record_size())
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect())
}

fn check_pod_size<T>(format: &Format) -> Result<(), PackError> {
    if size_of::<T>() != format.record_size() {
        return Err(PackError::RecordSize {
            record_size: format.record_size(),
            type_size: size_of::<T>(),
        });
    }
    Ok(())
}

// Bare field values are only accepted for single-field formats whose first
// value is a scalar.
fn is_wrapped(format: &Format, record: &Value) -> bool {
    format.fields().len() > 1 || record.first().is_some_and(Value::is_seq)
}

fn pack_into(
    out: &mut Vec<u8>,
    format: &Format,
    record: &Value,
    wrapped: bool,
) -> Result<(), PackError> {
    let fields = format.fields();
    if !wrapped {
        return pack_field(out, &fields[0], record);
    }

    let values = record
        .as_seq()
        .filter(|values| values.len() == fields.len())
        .ok_or_else(|| PackError::FieldCount {
            expected: fields.len(),
            found: record.to_string(),
        })?;

    for (field, value) in fields.iter().zip(values) {
        pack_field(out, field, value)?;
    }
    Ok(())
}

fn pack_field(out: &mut Vec<u8>, field: &Field, value: &Value) -> Result<(), PackError> {
    let shape_error = || PackError::Shape {
        field: field.name.clone(),
        expected: field.shape(),
        found: value.to_string(),
    };

    let items = value
        .as_seq()
        .filter(|items| items.len() == field.count)
        .ok_or_else(shape_error)?;

    let start = out.len();
    for item in items {
        if write_scalar(out, field.element_type, item).is_none() {
            out.truncate(start);
            return Err(shape_error());
        }
    }
    Ok(())
}

fn write_scalar(out: &mut Vec<u8>, ty: ElementType, value: &Value) -> Option<()> {
    match ty {
        ElementType::F32 => out.extend_from_slice(bytemuck::bytes_of(&(value.as_f64()? as f32))),
        ElementType::F64 => out.extend_from_slice(bytemuck::bytes_of(&value.as_f64()?)),
        ElementType::I8 => {
            out.extend_from_slice(bytemuck::bytes_of(&(checked_int(ty, value)? as i8)))
        }
        ElementType::U8 => out.push(checked_int(ty, value)? as u8),
        ElementType::I16 => {
            out.extend_from_slice(bytemuck::bytes_of(&(checked_int(ty, value)? as i16)))
        }
        ElementType::U16 => {
            out.extend_from_slice(bytemuck::bytes_of(&(checked_int(ty, value)? as u16)))
        }
        ElementType::I32 => {
            out.extend_from_slice(bytemuck::bytes_of(&(checked_int(ty, value)? as i32)))
        }
        ElementType::U32 => {
            out.extend_from_slice(bytemuck::bytes_of(&(checked_int(ty, value)? as u32)))
        }
    }
    Some(())
}

fn checked_int(ty: ElementType, value: &Value) -> Option<i64> {
    let v = value.as_i64()?;
    let (lo, hi) = ty.int_range()?;
    (lo..=hi).contains(&v).then_some(v)
}

fn decode(format: &Arc<Format>, bytes: &[u8]) -> Record {
    let values = format
        .fields()
        .iter()
        .map(|field| {
            let step = field.element_type.size();
            Value::Seq(
                bytes[field.range()]
                    .chunks_exact(step)
                    .map(|chunk| read_scalar(field.element_type, chunk))
                    .collect(),
            )
        })
        .collect();
    Record::new(Arc::clone(format), values)
}

fn read_scalar(ty: ElementType, bytes: &[u8]) -> Value {
    use bytemuck::pod_read_unaligned as read;

    match ty {
        ElementType::F32 => Value::Float(read::<f32>(bytes).into()),
        ElementType::F64 => Value::Float(read::<f64>(bytes)),
        ElementType::I8 => Value::Int(read::<i8>(bytes).into()),
        ElementType::U8 => Value::Int(bytes[0].into()),
        ElementType::I16 => Value::Int(read::<i16>(bytes).into()),
        ElementType::U16 => Value::Int(read::<u16>(bytes).into()),
        ElementType::I32 => Value::Int(read::<i32>(bytes).into()),
        ElementType::U32 => Value::Int(read::<u32>(bytes).into()),
    }
}
