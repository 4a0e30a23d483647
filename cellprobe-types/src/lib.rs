//! # cellprobe-types
//!
//! Core types for Nagios-style probes. This crate holds the parts of a check
//! that do not depend on any data store: result statuses, threshold ranges,
//! measured values and the performance-data line format.
//!
//! ## Example
//!
//! ```rust
//! use cellprobe_types::{format_perfdata, Measurement, PerfDataPoint, Status, Thresholds};
//!
//! let thresholds = Thresholds::parse(Some("80"), Some("0:90"), false).unwrap();
//! let measurement = Measurement::new("95");
//!
//! let value = measurement.numeric().unwrap();
//! assert_eq!(thresholds.evaluate(value).status(), Status::Critical);
//!
//! let points = vec![
//!     PerfDataPoint::new("value", value).with_thresholds(&thresholds),
//!     PerfDataPoint::seconds("query_time", 0.0125),
//! ];
//! assert_eq!(
//!     format_perfdata(&points, 4),
//!     "value=95.0000;80;90 query_time=0.0125s"
//! );
//! ```
//!
//! ## Range syntax
//!
//! Ranges follow the Nagios plugin guidelines: `[@]start:end`, where an
//! omitted `start` means 0, an omitted `end` means infinity, `~` as `start`
//! means negative infinity and a bare `N` means `0:N`. A leading `@` alerts
//! when the value is inside the range instead of outside it.

mod measurement;
mod perfdata;
mod range;
mod status;

pub use measurement::*;
pub use perfdata::*;
pub use range::*;
pub use status::*;

/// Decimal places used for perfdata values when none is configured.
pub const DEFAULT_PRECISION: usize = 4;
