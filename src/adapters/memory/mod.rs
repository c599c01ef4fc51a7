//! In-process family store
//!
//! Backs `--dry-run` and the test suite. It keeps the observable behaviour of
//! the service that the samples depend on: 404 for missing resources and
//! documents, 409 for duplicate ids within a partition, a request charge on
//! every operation, and paged query results honouring the page size.
//!
//! Request charges are simulated from the serialized document size, so they
//! are stable across runs but not comparable to real RU figures.

use crate::adapters::database::traits::{
    limit_pages, ContainerSpec, FamilyStore, ItemReceipt, PageStream, ProvisionOutcome,
    QueryOptions, QueryPage,
};
use crate::domain::{CosmosDbError, Family, FamilyQuery, QueryOrder, Result, SampleError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;

/// Base charge of a document write
const WRITE_CHARGE: f64 = 5.0;

/// Additional write charge per started KiB of document
const WRITE_CHARGE_PER_KB: f64 = 1.9;

/// Charge of a point read
const READ_CHARGE: f64 = 1.0;

/// Base charge of a query page
const QUERY_PAGE_CHARGE: f64 = 2.3;

/// Additional query charge per returned document
const QUERY_CHARGE_PER_ITEM: f64 = 0.1;

#[derive(Debug, Clone)]
struct StoredFamily {
    family: Family,
    /// Insertion sequence, stands in for `_ts`
    sequence: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    database_exists: bool,
    container_exists: bool,
    /// Keyed by (partition key value, id)
    items: HashMap<(String, String), StoredFamily>,
    next_sequence: u64,
}

/// Family store held entirely in memory
#[derive(Debug)]
pub struct InMemoryFamilyStore {
    database_name: String,
    container: ContainerSpec,
    state: RwLock<MemoryState>,
}

impl InMemoryFamilyStore {
    /// Create a store whose database and container do not exist yet
    pub fn new(database_name: impl Into<String>, container: ContainerSpec) -> Self {
        Self {
            database_name: database_name.into(),
            container,
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Create a store whose database and container already exist
    pub fn provisioned(database_name: impl Into<String>, container: ContainerSpec) -> Self {
        Self {
            database_name: database_name.into(),
            container,
            state: RwLock::new(MemoryState {
                database_exists: true,
                container_exists: true,
                ..MemoryState::default()
            }),
        }
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    /// True if no documents are stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn partition_value<'a>(&self, family: &'a Family) -> Result<&'a str> {
        family
            .partition_key_value(&self.container.partition_key)
            .ok_or_else(|| {
                SampleError::Validation(format!(
                    "Family '{}' has no value for partition key {}",
                    family.id, self.container.partition_key
                ))
            })
    }

    fn check_container(&self, state: &MemoryState) -> Result<()> {
        if !state.database_exists {
            return Err(CosmosDbError::service(
                CosmosDbError::NOT_FOUND,
                format!("Database '{}' does not exist", self.database_name),
            )
            .into());
        }
        if !state.container_exists {
            return Err(CosmosDbError::service(
                CosmosDbError::NOT_FOUND,
                format!("Container '{}' does not exist", self.container.name),
            )
            .into());
        }
        Ok(())
    }
}

fn write_charge(family: &Family) -> Result<f64> {
    let size = serde_json::to_vec(family)?.len();
    let kib = size.div_ceil(1024) as f64;
    Ok(WRITE_CHARGE + WRITE_CHARGE_PER_KB * kib)
}

#[async_trait]
impl FamilyStore for InMemoryFamilyStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn container(&self) -> &ContainerSpec {
        &self.container
    }

    async fn ensure_database(&self) -> Result<ProvisionOutcome> {
        let mut state = self.state.write().await;
        if state.database_exists {
            return Ok(ProvisionOutcome::AlreadyExists);
        }
        state.database_exists = true;
        Ok(ProvisionOutcome::Created)
    }

    async fn ensure_container(&self) -> Result<ProvisionOutcome> {
        let mut state = self.state.write().await;
        if !state.database_exists {
            return Err(CosmosDbError::ContainerCreationFailed(format!(
                "Database '{}' does not exist",
                self.database_name
            ))
            .into());
        }
        if state.container_exists {
            return Ok(ProvisionOutcome::AlreadyExists);
        }
        state.container_exists = true;
        Ok(ProvisionOutcome::Created)
    }

    async fn create_family(&self, family: &Family) -> Result<ItemReceipt> {
        let started = Instant::now();
        family.validate()?;
        let key = (self.partition_value(family)?.to_string(), family.id.clone());
        let request_charge = write_charge(family)?;

        let mut state = self.state.write().await;
        self.check_container(&state)?;
        if state.items.contains_key(&key) {
            return Err(CosmosDbError::service(
                CosmosDbError::CONFLICT,
                format!(
                    "Entity with the specified id already exists in the system. id: {}",
                    family.id
                ),
            )
            .into());
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.items.insert(
            key,
            StoredFamily {
                family: family.clone(),
                sequence,
            },
        );

        Ok(ItemReceipt {
            id: family.id.clone(),
            request_charge,
            duration: started.elapsed(),
        })
    }

    async fn read_family(&self, id: &str, partition_key: &str) -> Result<(Family, ItemReceipt)> {
        let started = Instant::now();
        let state = self.state.read().await;
        self.check_container(&state)?;

        let stored = state
            .items
            .get(&(partition_key.to_string(), id.to_string()))
            .ok_or_else(|| {
                CosmosDbError::service(
                    CosmosDbError::NOT_FOUND,
                    format!("Entity with the specified id does not exist in the system. id: {id}"),
                )
            })?;

        Ok((
            stored.family.clone(),
            ItemReceipt {
                id: id.to_string(),
                request_charge: READ_CHARGE,
                duration: started.elapsed(),
            },
        ))
    }

    async fn query_families(
        &self,
        query: &FamilyQuery,
        options: &QueryOptions,
    ) -> Result<PageStream> {
        let state = self.state.read().await;
        self.check_container(&state)?;

        let mut matched = Vec::new();
        for stored in state.items.values() {
            match query.matches(&stored.family) {
                Some(true) => matched.push(stored.clone()),
                Some(false) => {}
                None => {
                    return Err(CosmosDbError::UnsupportedQuery(format!(
                        "The in-memory store cannot evaluate query: {query}"
                    ))
                    .into())
                }
            }
        }
        drop(state);

        match query.order() {
            QueryOrder::NewestFirst => matched.sort_by(|a, b| b.sequence.cmp(&a.sequence)),
            QueryOrder::Unordered => matched.sort_by_key(|s| s.sequence),
        }

        let page_size = options.page_size.max(1);
        let total = matched.len();
        let families: Vec<Family> = matched.into_iter().map(|s| s.family).collect();

        let mut pages = Vec::new();
        for (index, chunk) in families.chunks(page_size).enumerate() {
            let consumed = (index + 1) * page_size;
            pages.push(Ok(QueryPage {
                request_charge: QUERY_PAGE_CHARGE + QUERY_CHARGE_PER_ITEM * chunk.len() as f64,
                continuation: (consumed < total).then(|| consumed.to_string()),
                items: chunk.to_vec(),
            }));
        }
        if pages.is_empty() {
            pages.push(Ok(QueryPage {
                items: Vec::new(),
                request_charge: QUERY_PAGE_CHARGE,
                continuation: None,
            }));
        }

        Ok(limit_pages(stream::iter(pages).boxed(), options.max_pages))
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!(database = %self.database_name, "Closing in-memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Child};
    use futures::TryStreamExt;

    fn spec() -> ContainerSpec {
        ContainerSpec {
            name: "FamilyContainer".to_string(),
            partition_key: "/lastName".to_string(),
            throughput: Some(400),
        }
    }

    fn family(id: &str, last_name: &str) -> Family {
        Family::builder()
            .id(id)
            .last_name(last_name)
            .address(Address::new("Seattle", "King", "WA"))
            .build()
            .unwrap()
    }

    async fn ready_store() -> InMemoryFamilyStore {
        let store = InMemoryFamilyStore::new("db", spec());
        store.ensure_database().await.unwrap();
        store.ensure_container().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let store = InMemoryFamilyStore::new("db", spec());
        assert_eq!(store.ensure_database().await.unwrap(), ProvisionOutcome::Created);
        assert_eq!(
            store.ensure_database().await.unwrap(),
            ProvisionOutcome::AlreadyExists
        );
        assert_eq!(store.ensure_container().await.unwrap(), ProvisionOutcome::Created);
        assert_eq!(
            store.ensure_container().await.unwrap(),
            ProvisionOutcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_container_requires_database() {
        let store = InMemoryFamilyStore::new("db", spec());
        assert!(store.ensure_container().await.is_err());
    }

    #[tokio::test]
    async fn test_create_before_provisioning_is_not_found() {
        let store = InMemoryFamilyStore::new("db", spec());
        let err = store.create_family(&family("a", "Andersen")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let store = ready_store().await;
        let receipt = store.create_family(&family("a", "Andersen")).await.unwrap();
        assert!(receipt.request_charge > 0.0);

        let err = store.create_family(&family("a", "Andersen")).await.unwrap_err();
        assert_eq!(err.status(), Some(409));

        // Same id in another partition is a different document
        store.create_family(&family("a", "Wakefield")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_read_back() {
        let store = ready_store().await;
        let original = family("a", "Andersen");
        store.create_family(&original).await.unwrap();

        let (read, receipt) = store.read_family("a", "Andersen").await.unwrap();
        assert_eq!(read, original);
        assert_eq!(receipt.request_charge, READ_CHARGE);

        let err = store.read_family("a", "Smith").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_query_pages() {
        let store = ready_store().await;
        for (i, name) in ["Andersen", "Wakefield", "Johnson", "Smith", "Andersen"]
            .iter()
            .enumerate()
        {
            store.create_family(&family(&i.to_string(), name)).await.unwrap();
        }

        let options = QueryOptions {
            page_size: 3,
            max_pages: None,
        };
        let pages: Vec<QueryPage> = store
            .query_families(&FamilyQuery::default(), &options)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items.len(), 3);
        assert_eq!(pages[0].continuation.as_deref(), Some("3"));
        assert_eq!(pages[1].items.len(), 1);
        assert!(pages[1].continuation.is_none());
    }

    #[tokio::test]
    async fn test_query_max_pages() {
        let store = ready_store().await;
        for i in 0..5 {
            store
                .create_family(&family(&i.to_string(), "Andersen"))
                .await
                .unwrap();
        }

        let options = QueryOptions {
            page_size: 1,
            max_pages: Some(2),
        };
        let pages: Vec<QueryPage> = store
            .query_families(&FamilyQuery::default(), &options)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[tokio::test]
    async fn test_undistricted_query_newest_first() {
        let store = ready_store().await;
        for id in ["first", "second"] {
            let f = Family::builder()
                .id(id)
                .last_name("Andersen")
                .address(Address::new("Austin", "Union", "TX"))
                .child(Child {
                    first_name: "Lee".to_string(),
                    family_name: "Andersen".to_string(),
                    gender: "male".to_string(),
                    grade: 3,
                    pets: Vec::new(),
                })
                .build()
                .unwrap();
            store.create_family(&f).await.unwrap();
        }

        let pages: Vec<QueryPage> = store
            .query_families(&FamilyQuery::UndistrictedWithSons, &QueryOptions::default())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let ids: Vec<&str> = pages[0].items.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_custom_query_unsupported() {
        let store = ready_store().await;
        let result = store
            .query_families(
                &FamilyQuery::Custom("SELECT * FROM c".to_string()),
                &QueryOptions::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(SampleError::CosmosDb(CosmosDbError::UnsupportedQuery(_)))
        ));
    }
}
