//! Selects and runs the probes for each health endpoint.

use futures_util::future;
use std::sync::Arc;
use tracing::{info, warn};

use super::probes::{DatabaseProbe, DiskProbe, HealthProbe, HeapProbe, RssProbe};
use super::report::HealthReport;
use crate::config::HealthConfig;
use crate::database::DatabaseManager;
use crate::monitoring::SystemMonitor;

/// The four probe collaborators, passed in explicitly so callers (and
/// tests) control what each endpoint talks to.
pub struct HealthService {
    database: Arc<dyn HealthProbe>,
    memory_heap: Arc<dyn HealthProbe>,
    memory_rss: Arc<dyn HealthProbe>,
    disk: Arc<dyn HealthProbe>,
}

impl HealthService {
    pub fn new(
        database: Arc<dyn HealthProbe>,
        memory_heap: Arc<dyn HealthProbe>,
        memory_rss: Arc<dyn HealthProbe>,
        disk: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            database,
            memory_heap,
            memory_rss,
            disk,
        }
    }

    pub fn from_config(
        config: &HealthConfig,
        db: DatabaseManager,
        monitor: Arc<SystemMonitor>,
    ) -> Self {
        Self::new(
            Arc::new(DatabaseProbe::new(db)),
            Arc::new(HeapProbe::new(monitor.clone(), config.heap_limit_bytes)),
            Arc::new(RssProbe::new(monitor.clone(), config.rss_limit_bytes)),
            Arc::new(DiskProbe::new(
                monitor,
                config.disk_path.clone(),
                config.disk_min_free_ratio,
            )),
        )
    }

    /// Combined check: all four probes, run concurrently, no short-circuit.
    pub async fn check(&self) -> HealthReport {
        self.run(&[
            &self.database,
            &self.memory_heap,
            &self.memory_rss,
            &self.disk,
        ])
        .await
    }

    /// Readiness gates traffic on the database alone; the memory and disk
    /// probes are never invoked here.
    pub async fn readiness(&self) -> HealthReport {
        self.run(&[&self.database]).await
    }

    /// Liveness runs zero probes; responding at all is the check.
    pub fn liveness(&self) -> HealthReport {
        HealthReport::empty()
    }

    async fn run(&self, probes: &[&Arc<dyn HealthProbe>]) -> HealthReport {
        let results = future::join_all(probes.iter().map(|probe| async move {
            let result = probe.check().await;

            if result.is_up() {
                info!("Health probe '{}' passed", probe.name());
            } else {
                warn!(
                    "Health probe '{}' failed: {}",
                    probe.name(),
                    result.message.as_deref().unwrap_or("no message")
                );
            }

            (probe.name().to_string(), result)
        }))
        .await;

        HealthReport::from_results(results)
    }
}
