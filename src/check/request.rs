//! Validated inputs of a single probe run.

use cellprobe_adapters::{CellQuery, Endpoint};
use cellprobe_types::{Thresholds, DEFAULT_PRECISION};
use regex::Regex;

/// Everything a run needs, already validated.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub endpoint: Endpoint,
    pub mode: Mode,
}

/// What the run does once connected.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Print the table names and exit UNKNOWN.
    ListTables,
    /// Check a single cell.
    Cell(CellCheck),
}

/// Settings for checking one cell.
#[derive(Debug, Clone)]
pub struct CellCheck {
    pub query: CellQuery,
    pub expected: Option<Regex>,
    pub thresholds: Thresholds,
    /// Decimal places for perfdata values and timings.
    pub precision: usize,
    /// Emit the cell value as perfdata (`NaN` when not numeric).
    pub graph: bool,
    pub units: Option<String>,
}

impl CellCheck {
    pub fn new(query: CellQuery) -> Self {
        Self {
            query,
            expected: None,
            thresholds: Thresholds::default(),
            precision: DEFAULT_PRECISION,
            graph: false,
            units: None,
        }
    }

    pub fn expected(mut self, pattern: Regex) -> Self {
        self.expected = Some(pattern);
        self
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn graph(mut self, graph: bool) -> Self {
        self.graph = graph;
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}
