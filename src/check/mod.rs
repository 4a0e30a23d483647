//! The check-and-report engine.
//!
//! A run walks through a fixed sequence of stages:
//!
//! ```text
//! Init ─▶ Connected ─▶ TargetValidated ─▶ Queried ─▶ Validated ─▶ ThresholdsEvaluated ─▶ Reported
//!   │          │              │              │            │
//!   └──────────┴──────────────┴──────────────┴────────────┴──▶ Reported (CRITICAL / UNKNOWN)
//! ```
//!
//! Any failure jumps straight to `Reported` carrying a [`CheckError`]. The
//! store session is held by a guard and released on every path before the
//! result is returned.

mod error;
mod request;
mod result;

pub use error::{CheckError, SUPPORT_MSG};
pub use request::{CellCheck, CheckRequest, Mode};
pub use result::CheckResult;

use std::fmt;
use std::ops::Deref;

use cellprobe_adapters::{CellSession, CellStore, Endpoint};
use cellprobe_types::{PerfDataPoint, Range, Status};
use tracing::{debug, info, warn};

use crate::timing::TimedOperation;
use crate::validate::validate;

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Connected,
    TargetValidated,
    Queried,
    Validated,
    ThresholdsEvaluated,
    Reported,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Connected => "connected",
            Stage::TargetValidated => "target-validated",
            Stage::Queried => "queried",
            Stage::Validated => "validated",
            Stage::ThresholdsEvaluated => "thresholds-evaluated",
            Stage::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// What a run prints and exits with.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Check(CheckResult),
    Tables(Vec<String>),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Check(result) => result.status(),
            Outcome::Tables(_) => Status::Unknown,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Outcome::Check(result) => result.render(),
            Outcome::Tables(tables) => format!("HBase Tables:\n\n{}", tables.join("\n")),
        }
    }
}

/// Run the request against `store`.
pub async fn run(store: &dyn CellStore, request: &CheckRequest) -> Outcome {
    match &request.mode {
        Mode::ListTables => match list_tables(store, &request.endpoint).await {
            Ok(tables) => Outcome::Tables(tables),
            Err(err) => {
                warn!(error = %err, "table listing failed");
                Outcome::Check(err.into())
            }
        },
        Mode::Cell(check) => {
            let mut ctx = CheckContext::new(&request.endpoint, check);
            Outcome::Check(ctx.run(store).await)
        }
    }
}

/// Connect and list all tables.
pub async fn list_tables(
    store: &dyn CellStore,
    endpoint: &Endpoint,
) -> Result<Vec<String>, CheckError> {
    info!("connecting to {}", endpoint);
    let connect = TimedOperation::new("connect")
        .timeout(endpoint.timeout)
        .run(store.connect(endpoint))
        .await;
    let mut session = SessionGuard::new(
        connect
            .outcome
            .map_err(|e| CheckError::connect(endpoint, e))?,
    );

    let tables = TimedOperation::new("list tables")
        .timeout(endpoint.timeout)
        .run(session.list_tables())
        .await
        .outcome
        .map_err(CheckError::list)?;
    session.close();
    Ok(tables)
}

/// Request-scoped state of one cell check.
#[derive(Debug)]
pub struct CheckContext<'a> {
    endpoint: &'a Endpoint,
    check: &'a CellCheck,
    stage: Stage,
}

impl<'a> CheckContext<'a> {
    pub fn new(endpoint: &'a Endpoint, check: &'a CellCheck) -> Self {
        Self {
            endpoint,
            check,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the check, turning any failure into a reportable result.
    pub async fn run(&mut self, store: &dyn CellStore) -> CheckResult {
        match self.execute(store).await {
            Ok(result) => result,
            Err(err) => {
                warn!(stage = %self.stage, error = %err, "check failed");
                self.advance(Stage::Reported);
                err.into()
            }
        }
    }

    /// Run the check, stopping at the first failure.
    pub async fn execute(&mut self, store: &dyn CellStore) -> Result<CheckResult, CheckError> {
        let endpoint = self.endpoint;
        let check = self.check;
        let query = &check.query;

        info!("connecting to {}", endpoint);
        let connect = TimedOperation::new("connect")
            .timeout(endpoint.timeout)
            .run(store.connect(endpoint))
            .await;
        let connect_time = connect.secs();
        let mut session = SessionGuard::new(
            connect
                .outcome
                .map_err(|e| CheckError::connect(endpoint, e))?,
        );
        info!("connected to {} in {} secs", session.description(), connect_time);
        self.advance(Stage::Connected);

        info!("checking table '{}'", query.table);
        let enabled = TimedOperation::new("table check")
            .timeout(endpoint.timeout)
            .run(session.is_table_enabled(&query.table))
            .await
            .outcome
            .map_err(CheckError::query)?;
        if !enabled {
            return Err(CheckError::TableDisabled(query.table.clone()));
        }
        self.advance(Stage::TargetValidated);

        info!("getting cells");
        let cells = TimedOperation::new("query")
            .timeout(endpoint.timeout)
            .run(session.cells(query))
            .await;
        let query_time = cells.secs();
        let cells = cells.outcome.map_err(CheckError::query)?;
        info!("queried in {} secs", query_time);
        debug!(?cells, "cells returned");
        info!("finished, closing connection");
        session.close();
        self.advance(Stage::Queried);

        let measurement = validate(cells, check.expected.as_ref())
            .map_err(|e| CheckError::validation(e, query))?;
        info!("value = {}", measurement.raw());
        self.advance(Stage::Validated);

        let mut message = format!("cell value = '{}' for {}", measurement.raw(), query);
        let status = match measurement.numeric() {
            Some(value) => {
                info!("value is numeric, checking thresholds");
                let evaluation = check.thresholds.evaluate(value);
                if evaluation.breaches_critical {
                    message.push_str(&describe_breach("critical", check.thresholds.critical));
                } else if evaluation.breaches_warning {
                    message.push_str(&describe_breach("warning", check.thresholds.warning));
                }
                evaluation.status()
            }
            None => Status::Ok,
        };
        self.advance(Stage::ThresholdsEvaluated);

        let mut result = CheckResult::new(status, message).with_precision(check.precision);
        if check.graph {
            result.push(match measurement.numeric() {
                Some(value) => {
                    let point = PerfDataPoint::new("value", value).with_thresholds(&check.thresholds);
                    match &check.units {
                        Some(units) => point.with_unit(units.as_str()),
                        None => point,
                    }
                }
                None => PerfDataPoint::nan("value"),
            });
        }
        result.push(PerfDataPoint::seconds("connect_time", connect_time));
        result.push(PerfDataPoint::seconds("query_time", query_time));
        self.advance(Stage::Reported);

        Ok(result)
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }
}

fn describe_breach(level: &str, range: Option<Range>) -> String {
    match range {
        Some(range) if range.invert => format!(" (inside {} range '{}')", level, range),
        Some(range) => format!(" (outside {} range '{}')", level, range),
        None => String::new(),
    }
}

/// Owns a session and closes it when dropped.
struct SessionGuard {
    session: Box<dyn CellSession>,
}

impl SessionGuard {
    fn new(session: Box<dyn CellSession>) -> Self {
        Self { session }
    }

    fn close(&mut self) {
        self.session.close();
    }
}

impl Deref for SessionGuard {
    type Target = dyn CellSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.close();
    }
}
