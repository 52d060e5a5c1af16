use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::probes::{DiskProbe, HealthProbe, HeapProbe, RssProbe};
use super::report::{HealthReport, ProbeResult, ProbeStatus, ReportStatus};
use super::service::HealthService;
use crate::monitoring::{DiskSpace, SystemMonitor};

const MIB: u64 = 1024 * 1024;

struct StaticProbe {
    name: &'static str,
    result: ProbeResult,
    calls: AtomicUsize,
}

impl StaticProbe {
    fn up(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            result: ProbeResult::up(),
            calls: AtomicUsize::new(0),
        })
    }

    fn down(name: &'static str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            result: ProbeResult::down(message),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    fn name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn service_with(
    database: Arc<StaticProbe>,
    memory_heap: Arc<StaticProbe>,
    memory_rss: Arc<StaticProbe>,
    disk: Arc<StaticProbe>,
) -> HealthService {
    HealthService::new(database, memory_heap, memory_rss, disk)
}

#[test]
fn test_probe_result_constructors() {
    let up = ProbeResult::up();
    assert_eq!(up.status, ProbeStatus::Up);
    assert!(up.message.is_none());
    assert!(up.is_up());

    let down = ProbeResult::down("it broke");
    assert_eq!(down.status, ProbeStatus::Down);
    assert_eq!(down.message.as_deref(), Some("it broke"));
    assert!(!down.is_up());
}

#[test]
fn test_empty_report_is_ok() {
    let report = HealthReport::empty();
    assert_eq!(report.status, ReportStatus::Ok);
    assert!(report.info.is_empty());
    assert!(report.error.is_empty());
    assert!(report.details.is_empty());
    assert!(report.is_ok());
}

#[test]
fn test_report_aggregation_all_up() {
    let report = HealthReport::from_results(vec![
        ("database".to_string(), ProbeResult::up()),
        ("disk".to_string(), ProbeResult::up()),
    ]);

    assert_eq!(report.status, ReportStatus::Ok);
    assert_eq!(report.info.len(), 2);
    assert!(report.error.is_empty());
    assert_eq!(report.details.len(), 2);
}

#[test]
fn test_report_aggregation_mixed() {
    let report = HealthReport::from_results(vec![
        ("database".to_string(), ProbeResult::down("unreachable")),
        ("disk".to_string(), ProbeResult::up()),
    ]);

    assert_eq!(report.status, ReportStatus::Error);
    assert!(report.info.contains_key("disk"));
    assert!(report.error.contains_key("database"));
    assert!(report.details.contains_key("database"));
    assert!(report.details.contains_key("disk"));
    assert!(!report.is_ok());
}

#[test]
fn test_report_serialization_shape() {
    let report = HealthReport::from_results(vec![
        ("database".to_string(), ProbeResult::down("unreachable")),
        ("disk".to_string(), ProbeResult::up()),
    ]);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["info"]["disk"]["status"], "up");
    assert_eq!(value["error"]["database"]["status"], "down");
    assert_eq!(value["error"]["database"]["message"], "unreachable");
    // Passing results carry no message key at all.
    assert!(value["info"]["disk"].get("message").is_none());
}

#[test]
fn test_heap_probe_threshold_boundary() {
    let monitor = Arc::new(SystemMonitor::new());
    let probe = HeapProbe::new(monitor, 150 * MIB);

    assert!(probe.evaluate(150 * MIB - 1).is_up());
    // Exactly at the limit must fail: the comparison is strictly-under.
    assert!(!probe.evaluate(150 * MIB).is_up());
    assert!(!probe.evaluate(150 * MIB + 1).is_up());
}

#[test]
fn test_rss_probe_threshold_boundary() {
    let monitor = Arc::new(SystemMonitor::new());
    let probe = RssProbe::new(monitor, 300 * MIB);

    assert!(probe.evaluate(0).is_up());
    assert!(probe.evaluate(300 * MIB - 1).is_up());
    assert!(!probe.evaluate(300 * MIB).is_up());
}

#[test]
fn test_disk_probe_threshold_boundary() {
    let monitor = Arc::new(SystemMonitor::new());
    let probe = DiskProbe::new(monitor, PathBuf::from("/"), 0.5);

    // Exactly half free passes: the free fraction is required to be >= 0.5.
    let exactly_half = DiskSpace {
        total_bytes: 1000,
        available_bytes: 500,
    };
    assert!(probe.evaluate(exactly_half).is_up());

    let just_under = DiskSpace {
        total_bytes: 1000,
        available_bytes: 499,
    };
    let result = probe.evaluate(just_under);
    assert!(!result.is_up());
    assert!(result.message.unwrap().contains("49.9%"));

    let empty_disk = DiskSpace {
        total_bytes: 0,
        available_bytes: 0,
    };
    assert!(!probe.evaluate(empty_disk).is_up());
}

#[tokio::test]
async fn test_check_runs_all_four_probes() {
    let database = StaticProbe::up("database");
    let memory_heap = StaticProbe::up("memory_heap");
    let memory_rss = StaticProbe::up("memory_rss");
    let disk = StaticProbe::up("disk");

    let service = service_with(
        database.clone(),
        memory_heap.clone(),
        memory_rss.clone(),
        disk.clone(),
    );

    let report = service.check().await;

    assert_eq!(report.status, ReportStatus::Ok);
    assert_eq!(report.info.len(), 4);
    assert!(report.error.is_empty());
    assert_eq!(report.details.len(), 4);

    for probe in [&database, &memory_heap, &memory_rss, &disk] {
        assert_eq!(probe.call_count(), 1);
    }
}

#[tokio::test]
async fn test_check_does_not_short_circuit() {
    let database = StaticProbe::down("database", "connection refused");
    let memory_heap = StaticProbe::up("memory_heap");
    let memory_rss = StaticProbe::up("memory_rss");
    let disk = StaticProbe::up("disk");

    let service = service_with(
        database.clone(),
        memory_heap.clone(),
        memory_rss.clone(),
        disk.clone(),
    );

    let report = service.check().await;

    assert_eq!(report.status, ReportStatus::Error);
    assert!(report.error.contains_key("database"));
    assert_eq!(report.info.len(), 3);
    assert!(report.info.contains_key("memory_heap"));
    assert!(report.info.contains_key("memory_rss"));
    assert!(report.info.contains_key("disk"));

    // The failing probe does not stop the others from running.
    for probe in [&database, &memory_heap, &memory_rss, &disk] {
        assert_eq!(probe.call_count(), 1);
    }
}

#[tokio::test]
async fn test_readiness_invokes_only_database() {
    let database = StaticProbe::up("database");
    let memory_heap = StaticProbe::up("memory_heap");
    let memory_rss = StaticProbe::up("memory_rss");
    let disk = StaticProbe::up("disk");

    let service = service_with(
        database.clone(),
        memory_heap.clone(),
        memory_rss.clone(),
        disk.clone(),
    );

    let report = service.readiness().await;

    assert_eq!(report.status, ReportStatus::Ok);
    assert_eq!(report.info.len(), 1);
    assert!(report.info.contains_key("database"));

    assert_eq!(database.call_count(), 1);
    assert_eq!(memory_heap.call_count(), 0);
    assert_eq!(memory_rss.call_count(), 0);
    assert_eq!(disk.call_count(), 0);
}

#[tokio::test]
async fn test_readiness_reports_database_failure() {
    let database = StaticProbe::down("database", "connection refused");
    let service = service_with(
        database.clone(),
        StaticProbe::up("memory_heap"),
        StaticProbe::up("memory_rss"),
        StaticProbe::up("disk"),
    );

    let report = service.readiness().await;

    assert_eq!(report.status, ReportStatus::Error);
    let failure = report.error.get("database").unwrap();
    assert_eq!(failure.message.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn test_liveness_runs_zero_probes() {
    let database = StaticProbe::down("database", "connection refused");
    let memory_heap = StaticProbe::up("memory_heap");
    let memory_rss = StaticProbe::up("memory_rss");
    let disk = StaticProbe::up("disk");

    let service = service_with(
        database.clone(),
        memory_heap.clone(),
        memory_rss.clone(),
        disk.clone(),
    );

    // Liveness stays ok regardless of dependency state.
    let report = service.liveness();
    assert_eq!(report.status, ReportStatus::Ok);
    assert!(report.details.is_empty());

    assert_eq!(database.call_count(), 0);
    assert_eq!(memory_heap.call_count(), 0);
    assert_eq!(memory_rss.call_count(), 0);
    assert_eq!(disk.call_count(), 0);
}
