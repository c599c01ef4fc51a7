//! Sample runner - the scripted sequence
//!
//! Ensures the database and container, creates the families, reads them back
//! and pages through one query. Per-item and per-page failures are logged and
//! recorded in the [`DemoSummary`]; the run carries on. Provisioning failures
//! abort the run.

use crate::adapters::database::traits::{FamilyStore, ItemReceipt, QueryOptions};
use crate::config::schema::{DemoMode, SampleConfig};
use crate::core::summary::{DemoSummary, OperationError, OperationKind};
use crate::domain::{Family, FamilyQuery, Result, SampleError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

/// What a run does
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Sequential or concurrent submission
    pub mode: DemoMode,

    /// Create the database and container first
    pub provision: bool,

    /// Point-read every created family
    pub read_back: bool,

    /// Operations in flight at once in concurrent mode
    pub max_concurrency: usize,

    pub query: FamilyQuery,
    pub query_options: QueryOptions,
}

impl DemoSettings {
    /// Derive settings from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured query cannot be resolved.
    pub fn from_config(config: &SampleConfig) -> Result<Self> {
        Ok(Self {
            mode: config.demo.mode,
            provision: config.cosmosdb.as_ref().map_or(true, |c| c.provision),
            read_back: config.demo.read_back,
            max_concurrency: config.demo.max_concurrency.max(1),
            query: config.demo.resolve_query()?,
            query_options: QueryOptions {
                page_size: config.demo.page_size,
                max_pages: config.demo.max_pages,
            },
        })
    }
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            mode: DemoMode::Sequential,
            provision: true,
            read_back: true,
            max_concurrency: 10,
            query: FamilyQuery::default(),
            query_options: QueryOptions::default(),
        }
    }
}

/// Runs the sample sequence against a [`FamilyStore`]
pub struct DemoRunner {
    store: Arc<dyn FamilyStore>,
    settings: DemoSettings,
}

impl DemoRunner {
    /// Create a new runner
    pub fn new(store: Arc<dyn FamilyStore>, settings: DemoSettings) -> Self {
        Self { store, settings }
    }

    /// The settings this runner uses
    pub fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    /// Execute the whole sequence
    ///
    /// # Arguments
    ///
    /// * `families` - Documents to create
    ///
    /// # Errors
    ///
    /// Returns an error only if provisioning fails. Item and query failures
    /// are reported through the summary. The store is closed either way.
    pub async fn run(&self, families: &[Family]) -> Result<DemoSummary> {
        let start_time = Instant::now();
        let mut summary = DemoSummary::new(self.store.backend_name());

        tracing::info!(
            backend = self.store.backend_name(),
            database = %self.store.database_name(),
            container = %self.store.container().name,
            mode = ?self.settings.mode,
            families = families.len(),
            query = self.settings.query.name(),
            "Starting sample run"
        );

        let outcome = self.run_steps(families, &mut summary).await;
        self.close().await;
        outcome?;

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Release the store; failures are only logged
    pub async fn close(&self) {
        if let Err(e) = self.store.close().await {
            tracing::warn!(error = %e, "Failed to close store");
        }
    }

    async fn run_steps(&self, families: &[Family], summary: &mut DemoSummary) -> Result<()> {
        if self.settings.provision {
            self.provision(summary).await?;
        } else {
            tracing::info!("Provisioning disabled, expecting database and container to exist");
        }

        let created = self.create_families(families, summary).await;

        if self.settings.read_back {
            self.read_families(&created, summary).await;
        }

        self.run_query(summary).await;
        Ok(())
    }

    /// Ensure the database and the container exist
    ///
    /// # Errors
    ///
    /// Returns the first provisioning error.
    pub async fn provision(&self, summary: &mut DemoSummary) -> Result<()> {
        let database = self.store.database_name().to_string();
        let outcome = self.store.ensure_database().await.map_err(|e| {
            log_failure(OperationKind::Provision, &database, &e);
            e
        })?;
        summary.database_created = outcome.created();
        tracing::info!(database = %database, created = outcome.created(), "Database ready");

        let container = self.store.container().clone();
        let outcome = self.store.ensure_container().await.map_err(|e| {
            log_failure(OperationKind::Provision, &container.name, &e);
            e
        })?;
        summary.container_created = outcome.created();
        tracing::info!(
            container = %container.name,
            partition_key = %container.partition_key,
            throughput = ?container.throughput,
            created = outcome.created(),
            "Container ready"
        );
        Ok(())
    }

    /// Create every family, returning the ones that were stored
    pub async fn create_families(
        &self,
        families: &[Family],
        summary: &mut DemoSummary,
    ) -> Vec<Family> {
        let results: Vec<(&Family, Result<ItemReceipt>)> = match self.settings.mode {
            DemoMode::Sequential => {
                let mut results = Vec::with_capacity(families.len());
                for family in families {
                    results.push((family, self.store.create_family(family).await));
                }
                results
            }
            DemoMode::Concurrent => {
                stream::iter(families)
                    .map(|family| {
                        let store = Arc::clone(&self.store);
                        async move { (family, store.create_family(family).await) }
                    })
                    .buffer_unordered(self.settings.max_concurrency)
                    .collect()
                    .await
            }
        };

        let mut created = Vec::with_capacity(results.len());
        for (family, result) in results {
            match result {
                Ok(receipt) => {
                    tracing::info!(
                        id = %receipt.id,
                        request_charge = receipt.request_charge,
                        duration_ms = receipt.duration.as_millis() as u64,
                        "Created item"
                    );
                    summary
                        .creates
                        .record_success(receipt.request_charge, receipt.duration);
                    created.push(family.clone());
                }
                Err(e) => {
                    log_failure(OperationKind::Create, &family.id, &e);
                    summary.creates.record_failure();
                    summary.add_error(OperationError::from_error(
                        OperationKind::Create,
                        &family.id,
                        &e,
                    ));
                }
            }
        }

        tracing::info!(
            created = summary.creates.succeeded,
            failed = summary.creates.failed,
            request_charge = summary.creates.request_charge,
            "Created items"
        );
        created
    }

    /// Point-read every family by id and partition key
    pub async fn read_families(&self, families: &[Family], summary: &mut DemoSummary) {
        let partition_key = self.store.container().partition_key.clone();

        let read_one = |family: &Family| {
            let store = Arc::clone(&self.store);
            let key = family.partition_key_value(&partition_key).map(str::to_string);
            let id = family.id.clone();
            async move {
                match key {
                    Some(key) => store.read_family(&id, &key).await,
                    None => Err(SampleError::Validation(format!(
                        "Family '{id}' has no partition key value"
                    ))),
                }
            }
        };

        let results: Vec<(&Family, Result<(Family, ItemReceipt)>)> = match self.settings.mode {
            DemoMode::Sequential => {
                let mut results = Vec::with_capacity(families.len());
                for family in families {
                    results.push((family, read_one(family).await));
                }
                results
            }
            DemoMode::Concurrent => {
                stream::iter(families)
                    .map(|family| {
                        let read = read_one(family);
                        async move { (family, read.await) }
                    })
                    .buffer_unordered(self.settings.max_concurrency)
                    .collect()
                    .await
            }
        };

        for (expected, result) in results {
            match result {
                Ok((family, receipt)) => {
                    if family != *expected {
                        tracing::warn!(id = %family.id, "Read item differs from the created one");
                    }
                    tracing::info!(
                        id = %receipt.id,
                        request_charge = receipt.request_charge,
                        duration_ms = receipt.duration.as_millis() as u64,
                        "Read item"
                    );
                    summary
                        .reads
                        .record_success(receipt.request_charge, receipt.duration);
                }
                Err(e) => {
                    log_failure(OperationKind::Read, &expected.id, &e);
                    summary.reads.record_failure();
                    summary.add_error(OperationError::from_error(
                        OperationKind::Read,
                        &expected.id,
                        &e,
                    ));
                }
            }
        }
    }

    /// Run the configured query, logging each page
    pub async fn run_query(&self, summary: &mut DemoSummary) {
        let query = &self.settings.query;
        let options = &self.settings.query_options;
        tracing::info!(
            query = %query.to_sql(),
            page_size = options.page_size,
            max_pages = ?options.max_pages,
            "Running query"
        );

        let mut pages = match self.store.query_families(query, options).await {
            Ok(pages) => pages,
            Err(e) => {
                log_failure(OperationKind::Query, query.name(), &e);
                summary.query_pages.record_failure();
                summary.add_error(OperationError::from_error(OperationKind::Query, query.name(), &e));
                return;
            }
        };

        let mut page_number = 0usize;
        let mut fetch_started = Instant::now();
        while let Some(page) = pages.next().await {
            page_number += 1;
            match page {
                Ok(page) => {
                    let ids: Vec<&str> = page.items.iter().map(|f| f.id.as_str()).collect();
                    tracing::info!(
                        page = page_number,
                        items = page.items.len(),
                        request_charge = page.request_charge,
                        continuation = ?page.continuation,
                        ids = ?ids,
                        "Got a page of query result"
                    );
                    summary
                        .query_pages
                        .record_success(page.request_charge, fetch_started.elapsed());
                    summary.query_items += page.items.len();
                    summary
                        .query_ids
                        .extend(page.items.into_iter().map(|f| f.id));
                }
                Err(e) => {
                    log_failure(OperationKind::Query, query.name(), &e);
                    summary.query_pages.record_failure();
                    summary.add_error(OperationError::from_error(
                        OperationKind::Query,
                        query.name(),
                        &e,
                    ));
                    break;
                }
            }
            fetch_started = Instant::now();
        }

        tracing::info!(
            pages = summary.query_pages.succeeded,
            items = summary.query_items,
            request_charge = summary.query_pages.request_charge,
            "Query complete"
        );
    }
}

/// Logs a caught error, separating service errors from client-side ones
fn log_failure(kind: OperationKind, target: &str, error: &SampleError) {
    if error.is_service_error() {
        tracing::error!(
            operation = kind.as_str(),
            target = %target,
            service_error = true,
            status = ?error.status(),
            hint = service_hint(error),
            error = %error,
            "Service rejected the request"
        );
    } else {
        tracing::error!(
            operation = kind.as_str(),
            target = %target,
            service_error = false,
            error = %error,
            "Operation failed"
        );
    }
}

/// Short explanation for the statuses the samples commonly hit
fn service_hint(error: &SampleError) -> Option<&'static str> {
    match error {
        SampleError::CosmosDb(e) if e.is_conflict() => Some("item already exists"),
        SampleError::CosmosDb(e) if e.is_not_found() => Some("database or container missing"),
        SampleError::CosmosDb(e) if e.is_throttled() => {
            Some("request rate too large, raise throughput or lower concurrency")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::ContainerSpec;
    use crate::adapters::memory::InMemoryFamilyStore;
    use crate::adapters::database::traits::{PageStream, ProvisionOutcome};
    use crate::core::families::canned_families;
    use crate::domain::CosmosDbError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> Arc<InMemoryFamilyStore> {
        Arc::new(InMemoryFamilyStore::new(
            "db",
            ContainerSpec {
                name: "FamilyContainer".to_string(),
                partition_key: "/lastName".to_string(),
                throughput: Some(400),
            },
        ))
    }

    #[tokio::test]
    async fn test_sequential_run() {
        let families = canned_families().unwrap();
        let runner = DemoRunner::new(store(), DemoSettings::default());

        let summary = runner.run(&families).await.unwrap();
        assert!(summary.is_successful());
        assert!(summary.database_created);
        assert!(summary.container_created);
        assert_eq!(summary.creates.succeeded, 4);
        assert_eq!(summary.reads.succeeded, 4);
        assert_eq!(summary.query_items, 3);
        assert!(summary.total_request_charge() > 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_is_recorded_not_fatal() {
        let mut families = canned_families().unwrap();
        families.push(families[0].clone());
        let settings = DemoSettings {
            mode: DemoMode::Concurrent,
            ..DemoSettings::default()
        };
        let runner = DemoRunner::new(store(), settings);

        let summary = runner.run(&families).await.unwrap();
        assert_eq!(summary.creates.succeeded, 4);
        assert_eq!(summary.creates.failed, 1);
        assert_eq!(summary.errors[0].status, Some(409));
        assert_eq!(summary.reads.succeeded, 4);
    }

    #[tokio::test]
    async fn test_unprovisioned_store_records_not_found() {
        let settings = DemoSettings {
            provision: false,
            ..DemoSettings::default()
        };
        let runner = DemoRunner::new(store(), settings);

        let summary = runner.run(&canned_families().unwrap()).await.unwrap();
        assert_eq!(summary.creates.failed, 4);
        assert!(summary.errors.iter().all(|e| e.status == Some(404)));
    }

    /// Store whose database cannot be provisioned
    struct ForbiddenStore {
        container: ContainerSpec,
        close_calls: AtomicUsize,
    }

    #[async_trait]
    impl FamilyStore for ForbiddenStore {
        fn backend_name(&self) -> &'static str {
            "forbidden"
        }

        fn database_name(&self) -> &str {
            "db"
        }

        fn container(&self) -> &ContainerSpec {
            &self.container
        }

        async fn ensure_database(&self) -> Result<ProvisionOutcome> {
            Err(CosmosDbError::service(403, "forbidden").into())
        }

        async fn ensure_container(&self) -> Result<ProvisionOutcome> {
            Ok(ProvisionOutcome::AlreadyExists)
        }

        async fn create_family(&self, _family: &Family) -> Result<ItemReceipt> {
            Err(CosmosDbError::service(403, "forbidden").into())
        }

        async fn read_family(&self, _id: &str, _pk: &str) -> Result<(Family, ItemReceipt)> {
            Err(CosmosDbError::service(403, "forbidden").into())
        }

        async fn query_families(
            &self,
            _query: &FamilyQuery,
            _options: &QueryOptions,
        ) -> Result<PageStream> {
            Err(CosmosDbError::service(403, "forbidden").into())
        }

        async fn close(&self) -> Result<()> {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_closed_when_provisioning_fails() {
        let store = Arc::new(ForbiddenStore {
            container: ContainerSpec {
                name: "FamilyContainer".to_string(),
                partition_key: "/lastName".to_string(),
                throughput: None,
            },
            close_calls: AtomicUsize::new(0),
        });
        let runner = DemoRunner::new(store.clone(), DemoSettings::default());

        let err = runner.run(&canned_families().unwrap()).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(store.close_calls.load(Ordering::SeqCst), 1);

        // The interrupt path closes through the runner directly
        runner.close().await;
        assert_eq!(store.close_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_service_hints() {
        let hint = |status| service_hint(&CosmosDbError::service(status, "x").into());
        assert_eq!(hint(409), Some("item already exists"));
        assert_eq!(hint(404), Some("database or container missing"));
        assert!(hint(429).unwrap().contains("throughput"));
        assert_eq!(hint(403), None);
        assert_eq!(service_hint(&SampleError::Other("x".to_string())), None);
    }
}
