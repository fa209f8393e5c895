use std::ops::Range;
use std::sync::Arc;

use crate::{
    buffer::{BufferBackend, BufferData, BufferTarget, BufferUsage},
    error::{BufferError, PackError},
    format::{Format, IntoFormat},
    pack::{self, Record},
    value::Value,
};

/// A buffer object paired with the [`Format`] of the records it holds.
///
/// Buffers created through [`Buffer::array`] or [`Buffer::element`] own the
/// underlying object and delete it on drop. Wrapped buffers only do so when
/// created with `owned = true`.
pub struct Buffer<B: BufferBackend> {
    backend: Arc<B>,
    id: B::Id,
    format: Arc<Format>,
    target: Option<BufferTarget>,
    usage: BufferUsage,
    owned: bool,
}

impl<B: BufferBackend> Buffer<B> {
    /// Wraps an existing buffer object. The target is left unset, see
    /// [`Buffer::with_target`].
    pub fn wrap(
        backend: Arc<B>,
        id: B::Id,
        format: impl IntoFormat,
        usage: BufferUsage,
        owned: bool,
    ) -> Result<Self, BufferError> {
        Ok(Self {
            backend,
            id,
            format: format.into_format()?,
            target: None,
            usage,
            owned,
        })
    }

    /// Buffer holding vertex data.
    pub fn array(
        backend: Arc<B>,
        format: impl IntoFormat,
        usage: BufferUsage,
    ) -> Result<Self, BufferError> {
        Self::alloc(backend, BufferTarget::Array, format, usage)
    }

    /// Buffer holding vertex indices.
    pub fn element(
        backend: Arc<B>,
        format: impl IntoFormat,
        usage: BufferUsage,
    ) -> Result<Self, BufferError> {
        Self::alloc(backend, BufferTarget::Element, format, usage)
    }

    fn alloc(
        backend: Arc<B>,
        target: BufferTarget,
        format: impl IntoFormat,
        usage: BufferUsage,
    ) -> Result<Self, BufferError> {
        let format = format.into_format()?;
        let id = backend.gen_buffer().map_err(BufferError::Backend)?;
        let buffer = Self {
            backend,
            id,
            format,
            target: Some(target),
            usage,
            owned: true,
        };
        buffer.bind(None)?;
        log::debug!(
            "Created {} buffer {:?} with format {}",
            target,
            id,
            buffer.format
        );
        Ok(buffer)
    }

    pub fn with_target(mut self, target: BufferTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn id(&self) -> B::Id {
        self.id
    }

    pub fn format(&self) -> &Arc<Format> {
        &self.format
    }

    pub fn target(&self) -> Option<BufferTarget> {
        self.target
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }

    pub fn valid(&self) -> bool {
        self.backend.is_buffer(self.id)
    }

    /// Binds to `target`, or to the buffer's own target when `None`.
    pub fn bind(&self, target: Option<BufferTarget>) -> Result<BufferTarget, BufferError> {
        let target = target.or(self.target).ok_or(BufferError::NoTarget)?;
        self.backend
            .bind(target, self.id)
            .map_err(BufferError::Backend)?;
        Ok(target)
    }

    /// Replaces the buffer contents with `records`.
    pub fn init(&self, records: &[Value]) -> Result<(), BufferError> {
        let bytes = pack::pack_many(&self.format, records)?;
        let target = self.bind(None)?;
        self.backend
            .buffer_data(target, BufferData::Bytes(&bytes), self.usage)
            .map_err(BufferError::Backend)
    }

    /// Resizes the buffer to `len` zeroed records.
    pub fn reserve(&self, len: usize) -> Result<(), BufferError> {
        let target = self.bind(None)?;
        self.backend
            .buffer_data(
                target,
                BufferData::Zeroed(self.byte_len(len)?),
                self.usage,
            )
            .map_err(BufferError::Backend)
    }

    pub fn size(&self) -> Result<usize, BufferError> {
        let target = self.bind(None)?;
        self.backend
            .buffer_size(target)
            .map_err(BufferError::Backend)
    }

    /// Usage reported by the backend for the current store.
    pub fn usage(&self) -> Result<BufferUsage, BufferError> {
        let target = self.bind(None)?;
        self.backend
            .buffer_usage(target)
            .map_err(BufferError::Backend)
    }

    /// Number of records the buffer holds.
    pub fn len(&self) -> Result<usize, BufferError> {
        Ok(self.size()? / self.format.record_size())
    }

    pub fn is_empty(&self) -> Result<bool, BufferError> {
        Ok(self.len()? == 0)
    }

    pub fn set(&self, index: usize, record: &Value) -> Result<(), BufferError> {
        let len = self.len()?;
        if index >= len {
            return Err(PackError::IndexOutOfRange { index, len }.into());
        }
        let bytes = pack::pack_one(&self.format, record)?;
        let target = self.bind(None)?;
        self.backend
            .buffer_sub_data(target, self.byte_len(index)?, &bytes)
            .map_err(BufferError::Backend)
    }

    /// Overwrites the records in `range`. The buffer is never resized, so
    /// `records` must hold exactly `range.len()` records.
    pub fn set_range(&self, range: Range<usize>, records: &[Value]) -> Result<(), BufferError> {
        let len = self.len()?;
        if range.start > range.end || range.end > len {
            return Err(BufferError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        if range.len() != records.len() {
            return Err(BufferError::Resize {
                expected: range.len(),
                found: records.len(),
            });
        }
        let bytes = pack::pack_many(&self.format, records)?;
        let target = self.bind(None)?;
        self.backend
            .buffer_sub_data(target, self.byte_len(range.start)?, &bytes)
            .map_err(BufferError::Backend)
    }

    pub fn get(&self, index: usize) -> Result<Record, BufferError> {
        let len = self.len()?;
        if index >= len {
            return Err(PackError::IndexOutOfRange { index, len }.into());
        }
        let record_size = self.format.record_size();
        let target = self.bind(None)?;
        let bytes = self
            .backend
            .read_sub_data(target, self.byte_len(index)?, record_size)
            .map_err(BufferError::Backend)?;
        Ok(pack::unpack_one(&self.format, &bytes, 0)?)
    }

    /// Reads back every record.
    pub fn records(&self) -> Result<Vec<Record>, BufferError> {
        let size = self.size()?;
        let target = self.bind(None)?;
        let bytes = self
            .backend
            .read_sub_data(target, 0, size)
            .map_err(BufferError::Backend)?;
        Ok(pack::unpack_all(&self.format, &bytes).collect())
    }

    /// Byte length of `records` whole records.
    fn byte_len(&self, records: usize) -> Result<usize, BufferError> {
        let record_size = self.format.record_size();
        records
            .checked_mul(record_size)
            .ok_or(BufferError::TooLarge {
                len: records,
                record_size,
            })
    }
}

impl<B: BufferBackend> Drop for Buffer<B> {
    fn drop(&mut self) {
        if !self.owned || !self.valid() {
            return;
        }
        log::trace!("Destroying buffer {:?}", self.id);
        if let Err(e) = self.backend.delete_buffer(self.id) {
            log::warn!("failed to delete buffer {:?}: {e:?}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HostBackend;

    #[test]
    fn wrapped_buffer_without_target_cannot_bind() {
        let backend = Arc::new(HostBackend::new());
        let id = backend.gen_buffer().unwrap();
        let buffer =
            Buffer::wrap(Arc::clone(&backend), id, "(1I)[index]", BufferUsage::StaticDraw, false)
                .unwrap();

        assert!(matches!(buffer.bind(None), Err(BufferError::NoTarget)));
        assert_eq!(buffer.bind(Some(BufferTarget::Element)).unwrap(), BufferTarget::Element);

        let buffer = buffer.with_target(BufferTarget::Element);
        buffer.reserve(3).unwrap();
        assert_eq!(buffer.len().unwrap(), 3);
    }

    #[test]
    fn invalid_format_fails_before_allocation() {
        let backend = Arc::new(HostBackend::new());
        let result = Buffer::array(Arc::clone(&backend), "(3f)[v]", BufferUsage::StaticDraw);
        assert!(matches!(result, Err(BufferError::Format(_))));
        assert_eq!(backend.live_buffers(), 0);
    }
}
