use std::fmt;

use crate::buffer::{BufferData, BufferTarget, BufferUsage};

/// Graphics API calls a [`Buffer`](super::Buffer) is built on.
///
/// Mirrors the GL buffer object model: data calls act on whatever buffer is
/// currently bound to `target`.
pub trait BufferBackend {
    type Id: Copy + Eq + fmt::Debug;

    fn gen_buffer(&self) -> anyhow::Result<Self::Id>;

    fn bind(&self, target: BufferTarget, id: Self::Id) -> anyhow::Result<()>;

    /// Replaces the whole store of the bound buffer.
    fn buffer_data(
        &self,
        target: BufferTarget,
        data: BufferData<'_>,
        usage: BufferUsage,
    ) -> anyhow::Result<()>;

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8])
    -> anyhow::Result<()>;

    fn read_sub_data(&self, target: BufferTarget, offset: usize, len: usize)
    -> anyhow::Result<Vec<u8>>;

    fn is_buffer(&self, id: Self::Id) -> bool;

    fn delete_buffer(&self, id: Self::Id) -> anyhow::Result<()>;

    fn buffer_size(&self, target: BufferTarget) -> anyhow::Result<usize>;

    fn buffer_usage(&self, target: BufferTarget) -> anyhow::Result<BufferUsage>;
}
