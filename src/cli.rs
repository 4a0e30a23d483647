//! Command line options and their validation.
//!
//! Everything is validated here, before any network I/O, so that a bad
//! option is reported as UNKNOWN without touching the cluster.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use cellprobe_adapters::{CellQuery, Endpoint};
use cellprobe_types::{ThresholdError, Thresholds};
use clap::{ArgAction, Parser};
use regex::Regex;
use thiserror::Error;

use crate::check::{CellCheck, CheckRequest, Mode};
use crate::config::Settings;

/// Units accepted in perfdata by the plugin guidelines.
pub const VALID_UNITS: &[&str] = &["%", "s", "ms", "us", "B", "KB", "MB", "GB", "TB", "c"];

/// Highest supported number of decimal places.
pub const MAX_PRECISION: usize = 16;

static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*|[0-9A-Fa-f:.]+)$")
        .expect("host regex is valid")
});

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\w.-]+:)?[\w.-]+$").expect("table regex is valid")
});

static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+:.*$").expect("column regex is valid"));

/// Invalid or missing options.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("{0} not defined")]
    Missing(&'static str),

    #[error("invalid {field} '{value}'")]
    Invalid { field: &'static str, value: String },

    #[error("invalid expected value regex '{pattern}'")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {level} threshold")]
    Threshold {
        level: &'static str,
        #[source]
        source: ThresholdError,
    },
}

#[derive(Parser, Debug)]
#[command(name = "check_hbase_cell", version)]
#[command(
    about = "Nagios plugin to check a specific HBase table's cell value via the REST gateway",
    long_about = "Nagios plugin to check a specific HBase table's cell value via the REST gateway.\n\n\
        Checks the table is enabled, reads the latest cell value for the given row and \
        column family:qualifier, checks it against an optional expected regex and optional \
        warning/critical ranges, and reports connect and query timings as perfdata."
)]
pub struct Args {
    /// HBase REST gateway host (default: localhost)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// HBase REST gateway port (default: 8080)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Table to query
    #[arg(short = 'T', long)]
    pub table: Option<String>,

    /// Row to query
    #[arg(short = 'R', long)]
    pub row: Option<String>,

    /// Column family:qualifier to query
    #[arg(short = 'C', long)]
    pub column: Option<String>,

    /// Expected regex for the cell's value
    #[arg(short = 'e', long)]
    pub expected: Option<String>,

    /// Warning threshold or ran:ge (inclusive)
    #[arg(short = 'w', long, allow_hyphen_values = true)]
    pub warning: Option<String>,

    /// Critical threshold or ran:ge (inclusive)
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    pub critical: Option<String>,

    /// Precision for perfdata values in decimal places (default: 4)
    #[arg(short = 'p', long)]
    pub precision: Option<usize>,

    /// Graph the cell's value. Non-numeric values are reported as NaN so the
    /// number of perfdata tokens stays the same between runs.
    #[arg(short = 'g', long)]
    pub graph: bool,

    /// Units to use when graphing the cell's value
    #[arg(short = 'u', long)]
    pub units: Option<String>,

    /// List tables and exit
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Timeout in seconds for each network step (default: 10)
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Use HTTPS to reach the gateway
    #[arg(short = 'S', long)]
    pub ssl: bool,

    /// Config file with connection defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose logging to stderr (repeat for more)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Validate the options, filling gaps from `settings`.
    pub fn into_request(self, settings: &Settings) -> Result<CheckRequest, UsageError> {
        let host = self.host.unwrap_or_else(|| settings.host.clone());
        validate_host(&host)?;

        let port = self.port.unwrap_or(settings.port);
        if port == 0 {
            return Err(invalid("port", port));
        }

        let timeout = self.timeout.unwrap_or(settings.timeout_secs);
        if timeout == 0 {
            return Err(invalid("timeout", timeout));
        }

        let endpoint = Endpoint::new(host, port)
            .with_timeout(Duration::from_secs(timeout))
            .with_tls(self.ssl || settings.tls);

        if self.list {
            return Ok(CheckRequest {
                endpoint,
                mode: Mode::ListTables,
            });
        }

        let table = self.table.ok_or(UsageError::Missing("table"))?;
        if !TABLE_RE.is_match(&table) {
            return Err(invalid("HBase table name", table));
        }
        let row = self.row.ok_or(UsageError::Missing("row"))?;
        if row.is_empty() {
            return Err(invalid("HBase row key", row));
        }
        let column = self.column.ok_or(UsageError::Missing("column"))?;
        if !COLUMN_RE.is_match(&column) {
            return Err(invalid("HBase column family:qualifier", column));
        }

        let precision = self.precision.unwrap_or(settings.precision);
        if precision > MAX_PRECISION {
            return Err(invalid("precision", precision));
        }

        if let Some(units) = &self.units {
            if !VALID_UNITS.contains(&units.as_str()) {
                return Err(invalid("units", units));
            }
        }

        let thresholds = parse_thresholds(self.warning.as_deref(), self.critical.as_deref())?;

        let mut check = CellCheck::new(CellQuery::new(table, row, column))
            .thresholds(thresholds)
            .precision(precision)
            .graph(self.graph);
        if let Some(pattern) = self.expected {
            let re = Regex::new(&pattern).map_err(|source| UsageError::Regex {
                pattern: pattern.clone(),
                source,
            })?;
            check = check.expected(re);
        }
        if let Some(units) = self.units {
            check = check.units(units);
        }

        Ok(CheckRequest {
            endpoint,
            mode: Mode::Cell(check),
        })
    }
}

/// First line of a clap parse error, without the `error:` prefix.
///
/// The full diagnostic still goes to stderr; this is what the plugin prints
/// on stdout.
pub fn parse_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("invalid arguments");
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn parse_thresholds(
    warning: Option<&str>,
    critical: Option<&str>,
) -> Result<Thresholds, UsageError> {
    // Parsed one level at a time so the error names the offending option.
    let warning = Thresholds::parse(warning, None, false)
        .map_err(|source| UsageError::Threshold {
            level: "warning",
            source,
        })?
        .warning;
    let critical = Thresholds::parse(None, critical, false)
        .map_err(|source| UsageError::Threshold {
            level: "critical",
            source,
        })?
        .critical;
    Ok(Thresholds { warning, critical })
}

fn validate_host(host: &str) -> Result<(), UsageError> {
    if host.len() > 255 || !HOST_RE.is_match(host) {
        return Err(invalid("host", host));
    }
    Ok(())
}

fn invalid(field: &'static str, value: impl ToString) -> UsageError {
    UsageError::Invalid {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CheckRequest, UsageError> {
        let mut argv = vec!["check_hbase_cell"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv)
            .unwrap()
            .into_request(&Settings::default())
    }

    fn cell_check(request: CheckRequest) -> CellCheck {
        match request.mode {
            Mode::Cell(check) => check,
            Mode::ListTables => panic!("expected a cell check"),
        }
    }

    #[test]
    fn test_full_cell_check() {
        let request = parse(&[
            "-H", "hbase1", "-P", "18080", "-T", "ns:metrics", "-R", "row1", "-C", "cf:q",
            "-e", "^[0-9]", "-w", "10", "-c", "@~:0", "-p", "2", "-g", "-u", "ms", "-t", "5",
        ])
        .unwrap();

        assert_eq!(request.endpoint.host, "hbase1");
        assert_eq!(request.endpoint.port, 18080);
        assert_eq!(request.endpoint.timeout, Duration::from_secs(5));
        assert!(!request.endpoint.tls);

        let check = cell_check(request);
        assert_eq!(check.query, CellQuery::new("ns:metrics", "row1", "cf:q"));
        assert_eq!(check.expected.as_ref().map(Regex::as_str), Some("^[0-9]"));
        assert_eq!(check.thresholds.warning.unwrap().to_string(), "10");
        assert_eq!(check.thresholds.critical.unwrap().to_string(), "@~:0");
        assert_eq!(check.precision, 2);
        assert!(check.graph);
        assert_eq!(check.units.as_deref(), Some("ms"));
    }

    #[test]
    fn test_defaults_from_settings() {
        let request = parse(&["-T", "t", "-R", "r", "-C", "cf:q"]).unwrap();
        assert_eq!(request.endpoint.host, "localhost");
        assert_eq!(request.endpoint.port, 8080);
        assert_eq!(request.endpoint.timeout, Duration::from_secs(10));

        let check = cell_check(request);
        assert_eq!(check.precision, 4);
        assert!(check.thresholds.is_empty());
        assert!(check.expected.is_none());
        assert!(!check.graph);
    }

    #[test]
    fn test_settings_fill_gaps_but_flags_win() {
        let settings = Settings {
            host: "from-config".to_string(),
            port: 9999,
            timeout_secs: 3,
            precision: 1,
            tls: true,
        };
        let args =
            Args::try_parse_from(["check_hbase_cell", "-P", "8081", "-l"]).unwrap();
        let request = args.into_request(&settings).unwrap();
        assert_eq!(request.endpoint.host, "from-config");
        assert_eq!(request.endpoint.port, 8081);
        assert_eq!(request.endpoint.timeout, Duration::from_secs(3));
        assert!(request.endpoint.tls);
        assert!(matches!(request.mode, Mode::ListTables));
    }

    #[test]
    fn test_list_mode_skips_cell_options() {
        let request = parse(&["--list"]).unwrap();
        assert!(matches!(request.mode, Mode::ListTables));
    }

    #[test]
    fn test_missing_options() {
        assert!(matches!(
            parse(&["-R", "r", "-C", "cf:q"]),
            Err(UsageError::Missing("table"))
        ));
        assert!(matches!(
            parse(&["-T", "t", "-C", "cf:q"]),
            Err(UsageError::Missing("row"))
        ));
        assert!(matches!(
            parse(&["-T", "t", "-R", "r"]),
            Err(UsageError::Missing("column"))
        ));
    }

    #[test]
    fn test_invalid_options() {
        let base = ["-T", "t", "-R", "r", "-C", "cf:q"];
        let with = |extra: &[&str]| {
            let mut args = base.to_vec();
            args.extend_from_slice(extra);
            parse(&args)
        };

        assert!(matches!(
            with(&["-H", "bad host!"]),
            Err(UsageError::Invalid { field: "host", .. })
        ));
        assert!(matches!(
            with(&["-P", "0"]),
            Err(UsageError::Invalid { field: "port", .. })
        ));
        assert!(matches!(
            with(&["-t", "0"]),
            Err(UsageError::Invalid { field: "timeout", .. })
        ));
        assert!(matches!(
            with(&["-u", "furlongs"]),
            Err(UsageError::Invalid { field: "units", .. })
        ));
        assert!(matches!(
            with(&["-p", "17"]),
            Err(UsageError::Invalid { field: "precision", .. })
        ));
        assert!(matches!(with(&["-e", "("]), Err(UsageError::Regex { .. })));
        assert!(matches!(
            parse(&["-T", "bad table", "-R", "r", "-C", "cf:q"]),
            Err(UsageError::Invalid { .. })
        ));
        assert!(matches!(
            parse(&["-T", "t", "-R", "r", "-C", "noqualifier"]),
            Err(UsageError::Invalid { .. })
        ));
    }

    #[test]
    fn test_threshold_errors_name_the_level() {
        let err = parse(&["-T", "t", "-R", "r", "-C", "cf:q", "-w", "5", "-c", "9:1"])
            .unwrap_err();
        assert!(matches!(
            err,
            UsageError::Threshold {
                level: "critical",
                ..
            }
        ));
        assert_eq!(err.to_string(), "invalid critical threshold");
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "invalid critical threshold: threshold start 9 is greater than end 1"
        );

        let err = parse(&["-T", "t", "-R", "r", "-C", "cf:q", "-w", "x"]).unwrap_err();
        assert!(matches!(err, UsageError::Threshold { level: "warning", .. }));
    }

    #[test]
    fn test_negative_threshold_values_accepted() {
        let check = cell_check(parse(&["-T", "t", "-R", "r", "-C", "cf:q", "-w", "-10:10"]).unwrap());
        assert_eq!(check.thresholds.warning.unwrap().lower, -10.0);
    }

    #[test]
    fn test_ipv6_host() {
        let request = parse(&["-H", "::1", "-l"]).unwrap();
        assert_eq!(request.endpoint.base_url(), "http://[::1]:8080");
    }

    #[test]
    fn test_regex_error_cause_reported_once() {
        let err = parse(&["-T", "t", "-R", "r", "-C", "cf:q", "-e", "("]).unwrap_err();
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert!(rendered.starts_with("invalid expected value regex '(': "));
        assert_eq!(rendered.matches("regex parse error").count(), 1, "{rendered}");
    }

    #[test]
    fn test_parse_error_summary() {
        for argv in [
            vec!["check_hbase_cell", "-P", "abc"],
            vec!["check_hbase_cell", "-P", "70000"],
            vec!["check_hbase_cell", "--bogus"],
        ] {
            let err = Args::try_parse_from(argv).unwrap_err();
            let summary = parse_error_summary(&err);
            assert!(!summary.is_empty());
            assert!(!summary.contains('\n'), "{summary}");
            assert!(!summary.starts_with("error:"), "{summary}");
        }

        let err = Args::try_parse_from(["check_hbase_cell", "-P", "abc"]).unwrap_err();
        assert!(parse_error_summary(&err).contains("'abc'"));
    }
}
