//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when talking to a data store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Transport failure (refused, reset, DNS...).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with an unexpected status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The table does not exist.
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    /// The column family does not exist in the table.
    #[error("column family '{0}' does not exist")]
    ColumnFamilyNotFound(String),

    /// The response could not have been produced by a conforming server.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The address or options could not be turned into a client.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

#[cfg(feature = "hbase")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connect() {
            StoreError::Connection(error_chain(&err))
        } else if err.is_decode() {
            StoreError::Malformed(error_chain(&err))
        } else {
            StoreError::Http(error_chain(&err))
        }
    }
}

/// `err` followed by each of its causes, joined with `": "`.
///
/// Client errors keep the root cause (e.g. `Connection refused`) in their
/// source chain rather than in their own message. Causes whose text is
/// already present are skipped.
#[cfg_attr(not(feature = "hbase"), allow(dead_code))]
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
