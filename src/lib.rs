//! # cellprobe
//!
//! A Nagios plugin, and the library behind it, that checks a single HBase
//! cell.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            cellprobe                             │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌─────────────┐  │
//! │  │   cli   │───▶│  check   │───▶│ validate │───▶│ CheckResult │──┼──▶ stdout + exit code
//! │  │(options)│    │ (stages) │    │ (shape)  │    │ (perfdata)  │  │
//! │  └─────────┘    └────┬─────┘    └──────────┘    └─────────────┘  │
//! │                      │ timing                                    │
//! │                      ▼                                           │
//! │                ┌───────────┐                                     │
//! │                │ CellStore │◀── HBaseRestStore | MemoryStore     │
//! │                └───────────┘                                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`cli`]**: Command line options, validated into a [`CheckRequest`]
//!   before any network I/O
//! - **[`config`]**: Connection defaults from a config file and the environment
//! - **[`check`]**: The staged run: connect, check the table, query, validate,
//!   evaluate thresholds, report
//! - **[`validate`]**: Cardinality and expected-pattern checks on query results
//! - **[`timing`]**: Timed, bounded execution of each network step
//! - **[`logging`]**: Diagnostic output on stderr
//!
//! ## Usage
//!
//! ### As a Nagios plugin
//!
//! ```bash
//! check_hbase_cell -H hbase-rest -T metrics -R host1 -C d:load -w 5 -c 10 -g
//! # OK: cell value = '0.75' for HBase table 'metrics' row 'host1' column 'd:load' | value=0.7500;5;10 connect_time=0.0031s query_time=0.0042s
//! ```
//!
//! ### As a library
//!
//! ```
//! use cellprobe::check::{self, CellCheck, CheckRequest, Mode};
//! use cellprobe_adapters::memory::MemoryStore;
//! use cellprobe_adapters::{CellQuery, Endpoint};
//! use cellprobe_types::{Status, Thresholds};
//!
//! let store = MemoryStore::builder()
//!     .table("metrics", |t| t.cell("host1", "d:load", "12"))
//!     .build();
//!
//! let request = CheckRequest {
//!     endpoint: Endpoint::new("localhost", 8080),
//!     mode: Mode::Cell(
//!         CellCheck::new(CellQuery::new("metrics", "host1", "d:load"))
//!             .thresholds(Thresholds::parse(Some("5"), Some("10"), false).unwrap()),
//!     ),
//! };
//!
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! let outcome = rt.block_on(check::run(&store, &request));
//! assert_eq!(outcome.status(), Status::Critical);
//! ```

pub mod check;
pub mod cli;
pub mod config;
pub mod logging;
pub mod timing;
pub mod validate;

pub use check::{CellCheck, CheckError, CheckRequest, CheckResult, Mode, Outcome};
pub use cli::{Args, UsageError};
pub use config::Settings;
