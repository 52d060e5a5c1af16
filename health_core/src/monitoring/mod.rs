pub mod alloc;
pub mod system;

pub use alloc::CountingAllocator;
pub use system::{DiskSpace, ProcessMemory, SystemMonitor};
