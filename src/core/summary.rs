//! Run summary and reporting
//!
//! Tracks what a sample run did: counts, request charges and durations per
//! operation kind, plus the errors that were caught and logged on the way.

use crate::domain::SampleError;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Kind of operation an error or statistic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Database or container provisioning
    Provision,
    /// Item create
    Create,
    /// Point read
    Read,
    /// Query page fetch
    Query,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Provision => "provision",
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Query => "query",
        }
    }
}

/// Counters for one kind of operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationStats {
    pub succeeded: usize,
    pub failed: usize,

    /// Request units charged by successful operations
    pub request_charge: f64,

    /// Sum of client-observed latencies
    pub total_duration: Duration,
}

impl OperationStats {
    /// Record a successful operation
    pub fn record_success(&mut self, request_charge: f64, duration: Duration) {
        self.succeeded += 1;
        self.request_charge += request_charge;
        self.total_duration += duration;
    }

    /// Record a failed operation
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Number of attempted operations
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Mean latency of successful operations
    pub fn mean_duration(&self) -> Duration {
        if self.succeeded == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.succeeded as u32
    }
}

/// An error caught during the run
#[derive(Debug, Clone)]
pub struct OperationError {
    pub kind: OperationKind,

    /// Document id or resource name the operation targeted
    pub target: String,

    /// HTTP status if the service answered
    pub status: Option<u16>,

    pub message: String,
}

impl OperationError {
    /// Capture an error for the summary
    pub fn from_error(kind: OperationKind, target: impl Into<String>, error: &SampleError) -> Self {
        Self {
            kind,
            target: target.into(),
            status: error.status(),
            message: error.to_string(),
        }
    }

    /// True if the service rejected the request
    pub fn is_service_error(&self) -> bool {
        self.status.is_some()
    }
}

/// Summary of a sample run
#[derive(Debug, Clone)]
pub struct DemoSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Backend the run used
    pub backend: String,

    /// True if this run created the database
    pub database_created: bool,

    /// True if this run created the container
    pub container_created: bool,

    pub creates: OperationStats,
    pub reads: OperationStats,

    /// Query statistics, one success per fetched page
    pub query_pages: OperationStats,

    /// Documents returned by the query
    pub query_items: usize,

    /// Ids returned by the query, in page order
    pub query_ids: Vec<String>,

    /// Wall-clock duration of the run
    pub duration: Duration,

    pub errors: Vec<OperationError>,
}

impl DemoSummary {
    /// Create a new empty summary
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            backend: backend.into(),
            database_created: false,
            container_created: false,
            creates: OperationStats::default(),
            reads: OperationStats::default(),
            query_pages: OperationStats::default(),
            query_items: 0,
            query_ids: Vec::new(),
            duration: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: OperationError) {
        self.errors.push(error);
    }

    /// Request units charged across all operations
    pub fn total_request_charge(&self) -> f64 {
        self.creates.request_charge + self.reads.request_charge + self.query_pages.request_charge
    }

    /// True if no operation failed
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            backend = %self.backend,
            started_at = %self.started_at.to_rfc3339(),
            database_created = self.database_created,
            container_created = self.container_created,
            created = self.creates.succeeded,
            create_failures = self.creates.failed,
            create_charge = format!("{:.2}", self.creates.request_charge),
            read = self.reads.succeeded,
            read_failures = self.reads.failed,
            read_charge = format!("{:.2}", self.reads.request_charge),
            query_pages = self.query_pages.succeeded,
            query_items = self.query_items,
            query_charge = format!("{:.2}", self.query_pages.request_charge),
            total_charge = format!("{:.2}", self.total_request_charge()),
            duration_ms = self.duration.as_millis() as u64,
            "Sample run completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sample run completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    operation = error.kind.as_str(),
                    target = %error.target,
                    status = ?error.status,
                    message = %error.message,
                    "Operation error"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CosmosDbError;

    #[test]
    fn test_summary_creation() {
        let summary = DemoSummary::new("memory");
        assert_eq!(summary.backend, "memory");
        assert_eq!(summary.creates.attempted(), 0);
        assert_eq!(summary.total_request_charge(), 0.0);
        assert!(summary.is_successful());
    }

    #[test]
    fn test_stats_accumulate() {
        let mut stats = OperationStats::default();
        stats.record_success(5.5, Duration::from_millis(10));
        stats.record_success(4.5, Duration::from_millis(30));
        stats.record_failure();

        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.attempted(), 3);
        assert_eq!(stats.request_charge, 10.0);
        assert_eq!(stats.mean_duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_total_request_charge() {
        let mut summary = DemoSummary::new("memory");
        summary.creates.record_success(10.0, Duration::ZERO);
        summary.reads.record_success(1.0, Duration::ZERO);
        summary.query_pages.record_success(2.5, Duration::ZERO);
        assert_eq!(summary.total_request_charge(), 13.5);
    }

    #[test]
    fn test_operation_error_keeps_status() {
        let error: SampleError = CosmosDbError::service(409, "conflict").into();
        let captured = OperationError::from_error(OperationKind::Create, "Andersen-1", &error);
        assert_eq!(captured.status, Some(409));
        assert!(captured.is_service_error());

        let error = SampleError::Validation("bad".to_string());
        let captured = OperationError::from_error(OperationKind::Create, "x", &error);
        assert!(!captured.is_service_error());
    }

    #[test]
    fn test_summary_add_error() {
        let mut summary = DemoSummary::new("memory");
        summary.add_error(OperationError::from_error(
            OperationKind::Read,
            "Smith-1",
            &SampleError::Other("boom".to_string()),
        ));
        assert!(!summary.is_successful());
        assert_eq!(summary.errors[0].kind, OperationKind::Read);
    }
}
