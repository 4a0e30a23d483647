//! # cellprobe-adapters
//!
//! Data store clients for cellprobe.
//!
//! A check only needs a handful of operations from a store: open a session,
//! confirm a table is enabled, read the latest value of one cell and list
//! tables. Those are captured by the [`CellStore`] and [`CellSession`]
//! traits; each adapter implements them for one backend.
//!
//! ## Supported Systems
//!
//! - **HBase** (`hbase` feature) - Reads cells through the HBase REST gateway
//! - **Memory** - In-process tables, used by tests and demos
//!
//! ## Quick Start
//!
//! ```rust
//! use cellprobe_adapters::memory::MemoryStore;
//! use cellprobe_adapters::{CellQuery, CellStore, Endpoint};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = MemoryStore::builder()
//!     .table("metrics", |t| t.cell("host1", "d:load", "0.75"))
//!     .build();
//!
//! let mut session = store.connect(&Endpoint::new("localhost", 8080)).await.unwrap();
//! let cells = session
//!     .cells(&CellQuery::new("metrics", "host1", "d:load"))
//!     .await
//!     .unwrap();
//! assert_eq!(cells, vec!["0.75".to_string()]);
//! session.close();
//! # });
//! ```

pub mod error;
pub mod memory;
mod store;

#[cfg(feature = "hbase")]
pub mod hbase;

pub use error::StoreError;
pub use store::{CellQuery, CellSession, CellStore, Endpoint, DEFAULT_TIMEOUT};
