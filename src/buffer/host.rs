use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use slotmap::{SlotMap, new_key_type};

use crate::buffer::{BufferBackend, BufferData, BufferTarget, BufferUsage};

new_key_type! { pub struct BufferKey; }

struct HostBuffer {
    data: Vec<u8>,
    usage: BufferUsage,
}

#[derive(Default)]
struct HostState {
    buffers: SlotMap<BufferKey, HostBuffer>,
    bindings: HashMap<BufferTarget, BufferKey>,
}

impl HostState {
    fn bound(&mut self, target: BufferTarget) -> anyhow::Result<&mut HostBuffer> {
        let key = *self
            .bindings
            .get(&target)
            .with_context(|| format!("no buffer bound to {target}"))?;
        self.buffers
            .get_mut(key)
            .with_context(|| format!("buffer bound to {target} was deleted"))
    }
}

/// Buffer backend that keeps every buffer store in process memory.
#[derive(Default)]
pub struct HostBackend {
    state: Mutex<HostState>,
}

impl HostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_buffers(&self) -> usize {
        self.lock().buffers.len()
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BufferBackend for HostBackend {
    type Id = BufferKey;

    fn gen_buffer(&self) -> anyhow::Result<BufferKey> {
        Ok(self.lock().buffers.insert(HostBuffer {
            data: Vec::new(),
            usage: BufferUsage::default(),
        }))
    }

    fn bind(&self, target: BufferTarget, id: BufferKey) -> anyhow::Result<()> {
        let mut state = self.lock();
        if !state.buffers.contains_key(id) {
            anyhow::bail!("cannot bind {id:?} to {target}: not a buffer");
        }
        state.bindings.insert(target, id);
        Ok(())
    }

    fn buffer_data(
        &self,
        target: BufferTarget,
        data: BufferData<'_>,
        usage: BufferUsage,
    ) -> anyhow::Result<()> {
        let mut state = self.lock();
        let buffer = state.bound(target)?;
        buffer.data = match data {
            BufferData::Bytes(bytes) => bytes.to_vec(),
            BufferData::Zeroed(len) => vec![0; len],
        };
        buffer.usage = usage;
        Ok(())
    }

    fn buffer_sub_data(
        &self,
        target: BufferTarget,
        offset: usize,
        data: &[u8],
    ) -> anyhow::Result<()> {
        let mut state = self.lock();
        let buffer = state.bound(target)?;
        let store_len = buffer.data.len();
        let dst = offset
            .checked_add(data.len())
            .and_then(|end| buffer.data.get_mut(offset..end))
            .with_context(|| {
                format!(
                    "write of {} byte(s) at {offset} overflows {store_len} byte store",
                    data.len()
                )
            })?;
        dst.copy_from_slice(data);
        Ok(())
    }

    fn read_sub_data(
        &self,
        target: BufferTarget,
        offset: usize,
        len: usize,
    ) -> anyhow::Result<Vec<u8>> {
        let mut state = self.lock();
        let buffer = state.bound(target)?;
        let store_len = buffer.data.len();
        offset
            .checked_add(len)
            .and_then(|end| buffer.data.get(offset..end))
            .map(<[u8]>::to_vec)
            .with_context(|| {
                format!("read of {len} byte(s) at {offset} overflows {store_len} byte store")
            })
    }

    fn is_buffer(&self, id: BufferKey) -> bool {
        self.lock().buffers.contains_key(id)
    }

    fn delete_buffer(&self, id: BufferKey) -> anyhow::Result<()> {
        let mut state = self.lock();
        state
            .buffers
            .remove(id)
            .with_context(|| format!("cannot delete {id:?}: not a buffer"))?;
        state.bindings.retain(|_, bound| *bound != id);
        Ok(())
    }

    fn buffer_size(&self, target: BufferTarget) -> anyhow::Result<usize> {
        Ok(self.lock().bound(target)?.data.len())
    }

    fn buffer_usage(&self, target: BufferTarget) -> anyhow::Result<BufferUsage> {
        Ok(self.lock().bound(target)?.usage)
    }
}
