//! Probes for the dependencies the service reports on.
//!
//! Each probe answers one question about one named resource and converts
//! any failure into a `down` result rather than propagating an error.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use super::report::ProbeResult;
use crate::database::DatabaseManager;
use crate::monitoring::{DiskSpace, SystemMonitor};

#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> ProbeResult;
}

/// Reachability probe against the relational database.
pub struct DatabaseProbe {
    db: DatabaseManager,
}

impl DatabaseProbe {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthProbe for DatabaseProbe {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> ProbeResult {
        match self.db.ping().await {
            Ok(()) => ProbeResult::up(),
            Err(e) => ProbeResult::down(format!("Database ping failed: {}", e)),
        }
    }
}

/// Heap usage probe. Passes while live heap bytes stay strictly under the
/// limit; usage exactly at the limit is down.
pub struct HeapProbe {
    monitor: Arc<SystemMonitor>,
    limit_bytes: u64,
}

impl HeapProbe {
    pub fn new(monitor: Arc<SystemMonitor>, limit_bytes: u64) -> Self {
        Self {
            monitor,
            limit_bytes,
        }
    }

    pub fn evaluate(&self, used_bytes: u64) -> ProbeResult {
        if used_bytes < self.limit_bytes {
            ProbeResult::up()
        } else {
            ProbeResult::down(format!(
                "Heap usage of {} bytes is not under the {} byte limit",
                used_bytes, self.limit_bytes
            ))
        }
    }
}

#[async_trait]
impl HealthProbe for HeapProbe {
    fn name(&self) -> &str {
        "memory_heap"
    }

    async fn check(&self) -> ProbeResult {
        self.evaluate(self.monitor.process_memory().heap_bytes)
    }
}

/// Resident-set-size probe, same comparison as the heap probe.
pub struct RssProbe {
    monitor: Arc<SystemMonitor>,
    limit_bytes: u64,
}

impl RssProbe {
    pub fn new(monitor: Arc<SystemMonitor>, limit_bytes: u64) -> Self {
        Self {
            monitor,
            limit_bytes,
        }
    }

    pub fn evaluate(&self, used_bytes: u64) -> ProbeResult {
        if used_bytes < self.limit_bytes {
            ProbeResult::up()
        } else {
            ProbeResult::down(format!(
                "RSS usage of {} bytes is not under the {} byte limit",
                used_bytes, self.limit_bytes
            ))
        }
    }
}

#[async_trait]
impl HealthProbe for RssProbe {
    fn name(&self) -> &str {
        "memory_rss"
    }

    async fn check(&self) -> ProbeResult {
        self.evaluate(self.monitor.process_memory().rss_bytes)
    }
}

/// Free-space probe for the filesystem containing `path`. Passes while the
/// free fraction is at least `min_free_ratio`; exactly at the ratio passes.
pub struct DiskProbe {
    monitor: Arc<SystemMonitor>,
    path: PathBuf,
    min_free_ratio: f64,
}

impl DiskProbe {
    pub fn new(monitor: Arc<SystemMonitor>, path: PathBuf, min_free_ratio: f64) -> Self {
        Self {
            monitor,
            path,
            min_free_ratio,
        }
    }

    pub fn evaluate(&self, space: DiskSpace) -> ProbeResult {
        let free_ratio = space.free_ratio();
        if free_ratio >= self.min_free_ratio {
            ProbeResult::up()
        } else {
            ProbeResult::down(format!(
                "Free space on {} is {:.1}%, below the required {:.1}%",
                self.path.display(),
                free_ratio * 100.0,
                self.min_free_ratio * 100.0
            ))
        }
    }
}

#[async_trait]
impl HealthProbe for DiskProbe {
    fn name(&self) -> &str {
        "disk"
    }

    async fn check(&self) -> ProbeResult {
        match self.monitor.disk_space(&self.path) {
            Some(space) => self.evaluate(space),
            None => ProbeResult::down(format!(
                "No filesystem found for path {}",
                self.path.display()
            )),
        }
    }
}
