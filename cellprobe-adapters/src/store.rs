//! The data store interface a check needs.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::StoreError;

/// Default per-request timeout, also used as the overall bound of each step.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub tls: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
            tls: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Base URL of an HTTP service on this endpoint.
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        if self.host.contains(':') {
            format!("{}://[{}]:{}", scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", scheme, self.host, self.port)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Locator of a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellQuery {
    pub table: String,
    pub row: String,
    /// `family:qualifier`
    pub column: String,
}

impl CellQuery {
    pub fn new(
        table: impl Into<String>,
        row: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            row: row.into(),
            column: column.into(),
        }
    }

    /// The column family part of the column.
    pub fn family(&self) -> &str {
        self.column
            .split_once(':')
            .map_or(self.column.as_str(), |(family, _)| family)
    }
}

impl fmt::Display for CellQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HBase table '{}' row '{}' column '{}'",
            self.table, self.row, self.column
        )
    }
}

/// A data store that can be connected to.
#[async_trait]
pub trait CellStore: Send + Sync {
    /// Open a session, failing if the server cannot be reached.
    async fn connect(&self, endpoint: &Endpoint) -> Result<Box<dyn CellSession>, StoreError>;
}

/// An open session against a data store.
///
/// Sessions are owned by one check run and must be closed before it reports.
#[async_trait]
pub trait CellSession: Send + Sync {
    /// Names of all tables.
    async fn list_tables(&self) -> Result<Vec<String>, StoreError>;

    /// Whether the table is enabled. A missing table is an error.
    async fn is_table_enabled(&self, table: &str) -> Result<bool, StoreError>;

    /// Latest version of each matching cell, as raw strings.
    ///
    /// A missing row or qualifier yields an empty list rather than an error.
    async fn cells(&self, query: &CellQuery) -> Result<Vec<String>, StoreError>;

    /// Release the session. Calling it more than once has no further effect.
    fn close(&mut self);

    /// Human-readable description, used in logs.
    fn description(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_base_url() {
        assert_eq!(
            Endpoint::new("hbase1", 8080).base_url(),
            "http://hbase1:8080"
        );
        assert_eq!(
            Endpoint::new("::1", 8443).with_tls(true).base_url(),
            "https://[::1]:8443"
        );
    }

    #[test]
    fn test_cell_query_family() {
        assert_eq!(CellQuery::new("t", "r", "cf:q").family(), "cf");
        assert_eq!(CellQuery::new("t", "r", "cf").family(), "cf");
    }

    #[test]
    fn test_cell_query_display() {
        assert_eq!(
            CellQuery::new("users", "row1", "info:name").to_string(),
            "HBase table 'users' row 'row1' column 'info:name'"
        );
    }
}
