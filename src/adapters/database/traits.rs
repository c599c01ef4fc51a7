//! Family store abstraction
//!
//! The samples talk to a [`FamilyStore`] rather than to the SDK directly so the
//! same scripted sequence runs against Azure Cosmos DB or the in-memory store.

use crate::domain::{Family, FamilyQuery, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::time::Duration;

/// Outcome of a create-if-not-exists call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The resource was created by this call
    Created,
    /// The resource was already there
    AlreadyExists,
}

impl ProvisionOutcome {
    /// True if this call created the resource
    pub fn created(self) -> bool {
        matches!(self, ProvisionOutcome::Created)
    }
}

/// Shape of the family container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Container name
    pub name: String,

    /// Partition key path, e.g. `/lastName`
    pub partition_key: String,

    /// Manual throughput in RU/s, `None` to inherit from the database
    pub throughput: Option<usize>,
}

/// Result of a single item operation
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReceipt {
    /// Document id
    pub id: String,

    /// Request units charged by the service
    pub request_charge: f64,

    /// Client-observed latency
    pub duration: Duration,
}

/// One page of query results
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub items: Vec<Family>,

    /// Request units charged for this page
    pub request_charge: f64,

    /// Continuation token for the next page, `None` on the last one
    pub continuation: Option<String>,
}

/// Paging options for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Preferred number of items per page
    pub page_size: usize,

    /// Stop after this many pages
    pub max_pages: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_pages: None,
        }
    }
}

/// Stream of query pages
pub type PageStream = BoxStream<'static, Result<QueryPage>>;

/// Truncates a page stream to `max_pages` when set
pub fn limit_pages(pages: PageStream, max_pages: Option<usize>) -> PageStream {
    match max_pages {
        Some(max) => pages.take(max).boxed(),
        None => pages,
    }
}

/// Storage backend for family documents
///
/// Implementations report request charges and keep the service's error
/// statuses (404, 409, 429 ...) visible through
/// [`CosmosDbError::Service`](crate::domain::CosmosDbError::Service).
#[async_trait]
pub trait FamilyStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Name of the database the store works in
    fn database_name(&self) -> &str;

    /// The container this store reads and writes
    fn container(&self) -> &ContainerSpec;

    /// Create the database unless it already exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database can neither be read nor created.
    async fn ensure_database(&self) -> Result<ProvisionOutcome>;

    /// Create the container described by [`FamilyStore::container`] unless it already exists
    ///
    /// # Errors
    ///
    /// Returns an error if the container can neither be read nor created.
    async fn ensure_container(&self) -> Result<ProvisionOutcome>;

    /// Insert a family document
    ///
    /// # Errors
    ///
    /// Returns a service error with status 409 if a document with the same id
    /// already exists in the partition.
    async fn create_family(&self, family: &Family) -> Result<ItemReceipt>;

    /// Point-read a family by id and partition key value
    ///
    /// # Errors
    ///
    /// Returns a service error with status 404 if the document does not exist.
    async fn read_family(&self, id: &str, partition_key: &str) -> Result<(Family, ItemReceipt)>;

    /// Run a query and return its pages lazily
    ///
    /// # Arguments
    ///
    /// * `query` - Query to execute
    /// * `options` - Page size hint and page limit
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be started; failures while
    /// fetching later pages surface as stream items.
    async fn query_families(&self, query: &FamilyQuery, options: &QueryOptions)
        -> Result<PageStream>;

    /// Release the client handle
    ///
    /// Called once at the end of every run, including failed and interrupted
    /// ones. Backends whose handle is freed on drop may only log here.
    async fn close(&self) -> Result<()>;
}
