//! The reportable result of a run.

use cellprobe_types::{format_perfdata, PerfDataPoint, Status, DEFAULT_PRECISION};

use super::CheckError;

/// Status, message and perfdata of a finished check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    status: Status,
    message: String,
    perfdata: Vec<PerfDataPoint>,
    precision: usize,
}

impl CheckResult {
    /// The message is flattened onto one line: control characters are escaped
    /// and `|` (the perfdata separator) becomes `¦`.
    pub fn new(status: Status, message: impl AsRef<str>) -> Self {
        Self {
            status,
            message: single_line(message.as_ref()),
            perfdata: Vec::new(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn push(&mut self, point: PerfDataPoint) {
        self.perfdata.push(point);
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn perfdata(&self) -> &[PerfDataPoint] {
        &self.perfdata
    }

    /// The single output line: `STATUS: message[ | perfdata]`.
    pub fn render(&self) -> String {
        if self.perfdata.is_empty() {
            format!("{}: {}", self.status, self.message)
        } else {
            format!(
                "{}: {} | {}",
                self.status,
                self.message,
                format_perfdata(&self.perfdata, self.precision)
            )
        }
    }
}

impl From<CheckError> for CheckResult {
    fn from(err: CheckError) -> Self {
        CheckResult::new(err.status(), err.to_string())
    }
}

fn single_line(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '|' => out.push('¦'),
            c if c.is_control() => out.extend(c.escape_debug()),
            c => out.push(c),
        }
    }
    out
}
