//! Performance data points and the perfdata line format.
//!
//! Each point renders as `label=value[unit];[warn];[crit];[min];[max]`.
//! Empty trailing fields are dropped; empty fields in the middle are kept so
//! positions stay meaningful to the consumer.

use core::fmt::Write;

use crate::{Range, Thresholds};

/// One performance data metric.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfDataPoint {
    pub label: String,
    /// Measured value; `NaN` renders as the bare token `label=NaN`.
    pub value: f64,
    pub unit: Option<String>,
    pub warn: Option<Range>,
    pub crit: Option<Range>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PerfDataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            unit: None,
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    /// A value that could not be measured as a number.
    pub fn nan(label: impl Into<String>) -> Self {
        Self::new(label, f64::NAN)
    }

    /// A duration in seconds, suffixed `s`.
    pub fn seconds(label: impl Into<String>, secs: f64) -> Self {
        Self::new(label, secs).with_unit("s")
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Copy the warning and critical ranges from `thresholds`.
    pub fn with_thresholds(mut self, thresholds: &Thresholds) -> Self {
        self.warn = thresholds.warning;
        self.crit = thresholds.critical;
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Render this point with `precision` decimal places.
    pub fn render(&self, precision: usize) -> String {
        let mut out = quote_label(&self.label);
        out.push('=');

        if self.value.is_nan() {
            out.push_str("NaN");
            return out;
        }

        let _ = write!(out, "{:.*}", precision, self.value);
        if let Some(unit) = &self.unit {
            out.push_str(unit);
        }

        let mut fields = [
            self.warn.map(|r| r.to_string()),
            self.crit.map(|r| r.to_string()),
            self.min.map(|v| format!("{:.*}", precision, v)),
            self.max.map(|v| format!("{:.*}", precision, v)),
        ]
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect::<Vec<_>>();

        while fields.last().is_some_and(String::is_empty) {
            fields.pop();
        }
        for field in fields {
            out.push(';');
            out.push_str(&field);
        }
        out
    }
}

/// Join points into the space-delimited perfdata section.
pub fn format_perfdata(points: &[PerfDataPoint], precision: usize) -> String {
    points
        .iter()
        .map(|p| p.render(precision))
        .collect::<Vec<_>>()
        .join(" ")
}

// Labels with spaces, '=' or quotes must be single-quoted, with quotes doubled.
fn quote_label(label: &str) -> String {
    if label.contains([' ', '=', '\'']) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value() {
        let point = PerfDataPoint::new("value", 42.5);
        assert_eq!(point.render(4), "value=42.5000");
        assert_eq!(point.render(1), "value=42.5");
    }

    #[test]
    fn test_unit_and_thresholds() {
        let thresholds = Thresholds::parse(Some("10"), Some("@20:30"), false).unwrap();
        let point = PerfDataPoint::new("load", 5.0)
            .with_unit("%")
            .with_thresholds(&thresholds);
        assert_eq!(point.render(2), "load=5.00%;10;@20:30");
    }

    #[test]
    fn test_trailing_fields_trimmed_middle_kept() {
        let crit_only = Thresholds::parse(None, Some("90:"), false).unwrap();
        let point = PerfDataPoint::new("value", 1.0).with_thresholds(&crit_only);
        assert_eq!(point.render(1), "value=1.0;;90:");

        let point = PerfDataPoint::new("value", 1.0).with_max(100.0);
        assert_eq!(point.render(1), "value=1.0;;;;100.0");

        let point = PerfDataPoint::new("value", 1.0).with_min(0.0).with_max(2.0);
        assert_eq!(point.render(0), "value=1;;;0;2");
    }

    #[test]
    fn test_nan_is_a_single_bare_token() {
        let thresholds = Thresholds::parse(Some("10"), Some("20"), false).unwrap();
        let point = PerfDataPoint::nan("value")
            .with_unit("ms")
            .with_thresholds(&thresholds);
        assert_eq!(point.render(4), "value=NaN");
    }

    #[test]
    fn test_seconds() {
        assert_eq!(
            PerfDataPoint::seconds("connect_time", 0.123456).render(4),
            "connect_time=0.1235s"
        );
    }

    #[test]
    fn test_quoted_labels() {
        assert_eq!(PerfDataPoint::new("a b", 1.0).render(0), "'a b'=1");
        assert_eq!(PerfDataPoint::new("it's", 1.0).render(0), "'it''s'=1");
    }

    #[test]
    fn test_format_joins_points() {
        let points = vec![
            PerfDataPoint::nan("value"),
            PerfDataPoint::seconds("connect_time", 0.5),
            PerfDataPoint::seconds("query_time", 0.25),
        ];
        assert_eq!(
            format_perfdata(&points, 4),
            "value=NaN connect_time=0.5000s query_time=0.2500s"
        );
        assert_eq!(format_perfdata(&[], 4), "");
    }
}
