//! In-memory store for tests and demos.
//!
//! ```rust
//! use cellprobe_adapters::memory::MemoryStore;
//!
//! let store = MemoryStore::builder()
//!     .table("metrics", |t| t.cell("host1", "d:load", "0.75"))
//!     .table("archive", |t| t.family("d").disabled())
//!     .build();
//! assert_eq!(store.closed_sessions(), 0);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CellQuery, CellSession, CellStore, Endpoint, StoreError};

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    enabled: bool,
    families: BTreeSet<String>,
    cells: BTreeMap<(String, String), Vec<String>>,
}

/// A [`CellStore`] backed by in-process tables.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<BTreeMap<String, MemoryTable>>,
    connect_error: Option<StoreError>,
    latency: Duration,
    closes: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create a new builder for configuring the store.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Number of sessions closed so far.
    pub fn closed_sessions(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CellStore for MemoryStore {
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn CellSession>, StoreError> {
        tokio::time::sleep(self.latency).await;
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }
        Ok(Box::new(MemorySession {
            tables: Arc::clone(&self.tables),
            latency: self.latency,
            closes: Arc::clone(&self.closes),
            closed: false,
            description: format!("memory://{}", endpoint),
        }))
    }
}

/// Builder for [`MemoryStore`].
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    tables: BTreeMap<String, MemoryTable>,
    connect_error: Option<StoreError>,
    latency: Duration,
}

impl MemoryStoreBuilder {
    /// Add an enabled table, configured by the closure.
    pub fn table<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(MemoryTableBuilder) -> MemoryTableBuilder,
    {
        let table = f(MemoryTableBuilder::default()).table;
        self.tables.insert(name.into(), table);
        self
    }

    /// Make every connection attempt fail with `err`.
    pub fn connect_error(mut self, err: StoreError) -> Self {
        self.connect_error = Some(err);
        self
    }

    /// Delay applied to connect and to every query.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore {
            tables: Arc::new(self.tables),
            connect_error: self.connect_error,
            latency: self.latency,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Builder for a single in-memory table.
#[derive(Debug)]
pub struct MemoryTableBuilder {
    table: MemoryTable,
}

impl Default for MemoryTableBuilder {
    fn default() -> Self {
        Self {
            table: MemoryTable {
                enabled: true,
                ..Default::default()
            },
        }
    }
}

impl MemoryTableBuilder {
    /// Declare a column family without any cells.
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.table.families.insert(family.into());
        self
    }

    /// Add a cell value. Adding the same row and column twice yields two cells.
    pub fn cell(
        mut self,
        row: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let column = column.into();
        let family = column
            .split_once(':')
            .map_or(column.as_str(), |(family, _)| family)
            .to_string();
        self.table.families.insert(family);
        self.table
            .cells
            .entry((row.into(), column))
            .or_default()
            .push(value.into());
        self
    }

    /// Mark the table as administratively disabled.
    pub fn disabled(mut self) -> Self {
        self.table.enabled = false;
        self
    }
}

#[derive(Debug)]
struct MemorySession {
    tables: Arc<BTreeMap<String, MemoryTable>>,
    latency: Duration,
    closes: Arc<AtomicUsize>,
    closed: bool,
    description: String,
}

impl MemorySession {
    fn table(&self, name: &str) -> Result<&MemoryTable, StoreError> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
    }
}

#[async_trait]
impl CellSession for MemorySession {
    async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        tokio::time::sleep(self.latency).await;
        Ok(self.tables.keys().cloned().collect())
    }

    async fn is_table_enabled(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.table(table)?.enabled)
    }

    async fn cells(&self, query: &CellQuery) -> Result<Vec<String>, StoreError> {
        tokio::time::sleep(self.latency).await;
        let table = self.table(&query.table)?;
        if !table.enabled {
            return Err(StoreError::Http(format!(
                "table '{}' is disabled",
                query.table
            )));
        }
        if !table.families.contains(query.family()) {
            return Err(StoreError::ColumnFamilyNotFound(query.family().to_string()));
        }
        Ok(table
            .cells
            .get(&(query.row.clone(), query.column.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::new("localhost", 8080)
    }

    #[tokio::test]
    async fn test_cells_lookup() {
        let store = MemoryStore::builder()
            .table("t", |t| {
                t.cell("r1", "cf:a", "1")
                    .cell("r1", "cf:b", "x")
                    .cell("r1", "cf:b", "y")
            })
            .build();
        let session = store.connect(&endpoint()).await.unwrap();

        assert_eq!(
            session.cells(&CellQuery::new("t", "r1", "cf:a")).await,
            Ok(vec!["1".to_string()])
        );
        assert_eq!(
            session
                .cells(&CellQuery::new("t", "r1", "cf:b"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            session.cells(&CellQuery::new("t", "missing", "cf:a")).await,
            Ok(vec![])
        );
        assert_eq!(session.description(), "memory://localhost:8080");
    }

    #[tokio::test]
    async fn test_missing_entities() {
        let store = MemoryStore::builder()
            .table("t", |t| t.family("cf"))
            .build();
        let session = store.connect(&endpoint()).await.unwrap();

        assert_eq!(
            session.is_table_enabled("nope").await,
            Err(StoreError::TableNotFound("nope".to_string()))
        );
        assert_eq!(
            session.cells(&CellQuery::new("t", "r", "other:q")).await,
            Err(StoreError::ColumnFamilyNotFound("other".to_string()))
        );
    }

    #[tokio::test]
    async fn test_disabled_table() {
        let store = MemoryStore::builder()
            .table("t", |t| t.cell("r", "cf:q", "v").disabled())
            .build();
        let session = store.connect(&endpoint()).await.unwrap();

        assert_eq!(session.is_table_enabled("t").await, Ok(false));
        assert!(matches!(
            session.cells(&CellQuery::new("t", "r", "cf:q")).await,
            Err(StoreError::Http(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_error() {
        let store = MemoryStore::builder()
            .connect_error(StoreError::Connection("refused".to_string()))
            .build();
        assert!(store.connect(&endpoint()).await.is_err());
    }

    #[tokio::test]
    async fn test_close_counted_once() {
        let store = MemoryStore::builder().table("b", |t| t).table("a", |t| t).build();
        let mut session = store.connect(&endpoint()).await.unwrap();

        assert_eq!(
            session.list_tables().await.unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );

        session.close();
        session.close();
        assert_eq!(store.closed_sessions(), 1);
    }
}
