//! Failures that end a check early, and the status each one reports.

use cellprobe_adapters::{CellQuery, Endpoint, StoreError};
use cellprobe_types::Status;
use thiserror::Error;

use crate::timing::TimedError;
use crate::validate::ValidationError;

/// Appended to failures that a conforming server cannot produce.
pub const SUPPORT_MSG: &str = "API may have changed, please re-run with -vvv and file a support \
report including the full output";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    /// Timeout or transport failure while connecting.
    #[error("{0}")]
    Connectivity(String),

    #[error("table '{0}' is not enabled!")]
    TableDisabled(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("column family '{0}' does not exist")]
    ColumnFamilyNotFound(String),

    /// Timeout or transport failure after connecting.
    #[error("{0}")]
    Query(String),

    #[error("no cell value found in {0}, does row / column family combination exist?")]
    CellNotFound(String),

    #[error("more than one cell returned ({0} cells)! {support}", support = SUPPORT_MSG)]
    AmbiguousResult(usize),

    #[error("malformed response: {0}. {support}", support = SUPPORT_MSG)]
    MalformedResult(String),

    #[error("cell value '{value}' (expected regex '{expected}') for {cell}")]
    PatternMismatch {
        value: String,
        expected: String,
        cell: String,
    },

    #[error("error while trying to get table list: {0}")]
    ListTables(String),
}

impl CheckError {
    /// Contract violations are UNKNOWN; everything else is CRITICAL.
    pub fn status(&self) -> Status {
        match self {
            CheckError::AmbiguousResult(_) | CheckError::MalformedResult(_) => Status::Unknown,
            _ => Status::Critical,
        }
    }

    pub(crate) fn connect(endpoint: &Endpoint, err: TimedError<StoreError>) -> Self {
        match err {
            TimedError::Elapsed(bound) => CheckError::Connectivity(format!(
                "connection to {} timed out after {:?}",
                endpoint, bound
            )),
            TimedError::Failed(StoreError::Malformed(msg)) => CheckError::MalformedResult(msg),
            TimedError::Failed(err) => CheckError::Connectivity(err.to_string()),
        }
    }

    pub(crate) fn query(err: TimedError<StoreError>) -> Self {
        match err {
            TimedError::Elapsed(bound) => {
                CheckError::Query(format!("query timed out after {:?}", bound))
            }
            TimedError::Failed(StoreError::TableNotFound(table)) => {
                CheckError::TableNotFound(table)
            }
            TimedError::Failed(StoreError::ColumnFamilyNotFound(family)) => {
                CheckError::ColumnFamilyNotFound(family)
            }
            TimedError::Failed(StoreError::Malformed(msg)) => CheckError::MalformedResult(msg),
            TimedError::Failed(err) => CheckError::Query(err.to_string()),
        }
    }

    pub(crate) fn list(err: TimedError<StoreError>) -> Self {
        match err {
            TimedError::Elapsed(bound) => {
                CheckError::ListTables(format!("timed out after {:?}", bound))
            }
            TimedError::Failed(StoreError::Malformed(msg)) => CheckError::MalformedResult(msg),
            TimedError::Failed(err) => CheckError::ListTables(err.to_string()),
        }
    }

    pub(crate) fn validation(err: ValidationError, query: &CellQuery) -> Self {
        match err {
            ValidationError::NotFound => CheckError::CellNotFound(query.to_string()),
            ValidationError::Ambiguous(count) => CheckError::AmbiguousResult(count),
            ValidationError::PatternMismatch { value, expected } => CheckError::PatternMismatch {
                value,
                expected,
                cell: query.to_string(),
            },
        }
    }
}
