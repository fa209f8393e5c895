mod backend;
mod host;
mod resource;
mod spec;

pub use backend::BufferBackend;
pub use host::{BufferKey, HostBackend};
pub use resource::Buffer;
pub use spec::{BufferData, BufferTarget, BufferUsage};
