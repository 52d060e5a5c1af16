pub mod probes;
pub mod report;
pub mod service;

#[cfg(test)]
mod tests;

pub use probes::{DatabaseProbe, DiskProbe, HealthProbe, HeapProbe, RssProbe};
pub use report::{HealthReport, ProbeResult, ProbeStatus, ReportStatus};
pub use service::HealthService;
