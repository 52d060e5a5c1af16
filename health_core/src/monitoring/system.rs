//! Process memory and disk space sampling for the health probes.

use std::path::Path;
use std::sync::Mutex;
use sysinfo::{Disks, Pid, System};
use tracing::debug;

use super::alloc;

#[derive(Debug, Clone, Copy)]
pub struct ProcessMemory {
    pub heap_bytes: u64,
    pub rss_bytes: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct DiskSpace {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl DiskSpace {
    pub fn free_ratio(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.available_bytes as f64 / self.total_bytes as f64
    }
}

pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Pid,
}

impl SystemMonitor {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());
        system.refresh_process(pid);

        Self {
            system: Mutex::new(system),
            pid,
        }
    }

    /// Current heap and resident-set usage of this process. Heap comes from
    /// the counting allocator, RSS from the OS process table.
    pub fn process_memory(&self) -> ProcessMemory {
        let mut system = self.system.lock().unwrap();
        system.refresh_process(self.pid);

        let rss_bytes = system
            .process(self.pid)
            .map(|process| process.memory())
            .unwrap_or(0);

        let memory = ProcessMemory {
            heap_bytes: alloc::allocated_bytes(),
            rss_bytes,
        };

        debug!(
            "Sampled process memory: heap={} bytes, rss={} bytes",
            memory.heap_bytes, memory.rss_bytes
        );

        memory
    }

    /// Total and available space of the filesystem containing `path`,
    /// resolved to the disk with the longest matching mount point.
    pub fn disk_space(&self, path: &Path) -> Option<DiskSpace> {
        let disks = Disks::new_with_refreshed_list();

        disks
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| DiskSpace {
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_memory_sampling() {
        let monitor = SystemMonitor::new();
        let memory = monitor.process_memory();

        // RSS of a running test process is never zero.
        assert!(memory.rss_bytes > 0);
    }

    #[test]
    fn test_disk_space_for_root() {
        let monitor = SystemMonitor::new();
        let space = monitor.disk_space(Path::new("/")).expect("root filesystem");

        assert!(space.total_bytes > 0);
        assert!(space.available_bytes <= space.total_bytes);
    }

    #[test]
    fn test_free_ratio() {
        let space = DiskSpace {
            total_bytes: 100,
            available_bytes: 50,
        };
        assert_eq!(space.free_ratio(), 0.5);

        let empty = DiskSpace {
            total_bytes: 0,
            available_bytes: 0,
        };
        assert_eq!(empty.free_ratio(), 0.0);
    }
}
