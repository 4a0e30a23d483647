//! Threshold ranges and their evaluation.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::Status;

/// Errors produced while parsing a threshold range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// The range text was empty (or only `@`).
    #[error("empty threshold")]
    Empty,

    /// A bound was not a finite number.
    #[error("invalid threshold bound '{0}'")]
    InvalidBound(String),

    /// `start` is greater than `end`.
    #[error("threshold start {start} is greater than end {end}")]
    Inverted { start: f64, end: f64 },

    /// A negative start was given while only positive thresholds are allowed.
    #[error("threshold start {0} may not be negative")]
    Negative(f64),
}

/// A Nagios threshold range.
///
/// Without `invert` the range is the acceptable interval and a value outside
/// of it breaches. With `invert` the range is the alert interval and a value
/// inside of it breaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lower: f64,
    pub upper: f64,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
    pub invert: bool,
}

impl Range {
    /// Inclusive acceptable interval `[lower, upper]`.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            lower_inclusive: true,
            upper_inclusive: true,
            invert: false,
        }
    }

    /// Acceptable interval `[lower, +inf)`.
    pub fn at_least(lower: f64) -> Self {
        Self::new(lower, f64::INFINITY)
    }

    /// Acceptable interval `[0, upper]`.
    pub fn at_most(upper: f64) -> Self {
        Self::new(0.0, upper)
    }

    /// Alert when the value is inside the range instead of outside it.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Exclude `lower` itself from the interval.
    pub fn exclusive_lower(mut self) -> Self {
        self.lower_inclusive = false;
        self
    }

    /// Exclude `upper` itself from the interval.
    pub fn exclusive_upper(mut self) -> Self {
        self.upper_inclusive = false;
        self
    }

    /// Parse a `[@]start:end` spec.
    ///
    /// When `positive_only` is set a negative `start` (including `~`) is
    /// rejected.
    pub fn parse(spec: &str, positive_only: bool) -> Result<Self, ThresholdError> {
        let spec = spec.trim();
        let (invert, body) = match spec.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        if body.is_empty() {
            return Err(ThresholdError::Empty);
        }

        let (lower, upper) = match body.split_once(':') {
            Some((start, end)) => {
                let lower = match start {
                    "" => 0.0,
                    "~" => f64::NEG_INFINITY,
                    s => parse_bound(s)?,
                };
                let upper = match end {
                    "" => f64::INFINITY,
                    s => parse_bound(s)?,
                };
                (lower, upper)
            }
            None => (0.0, parse_bound(body)?),
        };

        if lower > upper {
            return Err(ThresholdError::Inverted {
                start: lower,
                end: upper,
            });
        }
        if positive_only && lower < 0.0 {
            return Err(ThresholdError::Negative(lower));
        }

        let mut range = Self::new(lower, upper);
        range.invert = invert;
        Ok(range)
    }

    /// Whether `value` lies within the bounds, honouring inclusivity.
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = if self.lower_inclusive {
            value >= self.lower
        } else {
            value > self.lower
        };
        let below_upper = if self.upper_inclusive {
            value <= self.upper
        } else {
            value < self.upper
        };
        above_lower && below_upper
    }

    /// Whether `value` should raise an alert for this range.
    pub fn breached_by(&self, value: f64) -> bool {
        self.contains(value) == self.invert
    }
}

impl FromStr for Range {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, false)
    }
}

impl fmt::Display for Range {
    /// Canonical Nagios form, as used in perfdata `warn`/`crit` fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invert {
            f.write_str("@")?;
        }
        let open_upper = self.upper == f64::INFINITY;
        if self.lower == 0.0 && !open_upper {
            return write!(f, "{}", self.upper);
        }
        if self.lower == f64::NEG_INFINITY {
            f.write_str("~:")?;
        } else {
            write!(f, "{}:", self.lower)?;
        }
        if !open_upper {
            write!(f, "{}", self.upper)?;
        }
        Ok(())
    }
}

fn parse_bound(s: &str) -> Result<f64, ThresholdError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ThresholdError::InvalidBound(s.to_string()))
}

/// Warning and critical ranges for a single measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thresholds {
    pub warning: Option<Range>,
    pub critical: Option<Range>,
}

impl Thresholds {
    /// Parse optional warning and critical specs.
    pub fn parse(
        warning: Option<&str>,
        critical: Option<&str>,
        positive_only: bool,
    ) -> Result<Self, ThresholdError> {
        Ok(Self {
            warning: warning.map(|s| Range::parse(s, positive_only)).transpose()?,
            critical: critical.map(|s| Range::parse(s, positive_only)).transpose()?,
        })
    }

    /// True when neither level is configured.
    pub fn is_empty(&self) -> bool {
        self.warning.is_none() && self.critical.is_none()
    }

    /// Evaluate both levels independently.
    pub fn evaluate(&self, value: f64) -> Evaluation {
        Evaluation {
            breaches_warning: self.warning.is_some_and(|r| r.breached_by(value)),
            breaches_critical: self.critical.is_some_and(|r| r.breached_by(value)),
        }
    }
}

/// Outcome of evaluating a value against [`Thresholds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub breaches_warning: bool,
    pub breaches_critical: bool,
}

impl Evaluation {
    /// Critical wins over warning, warning over OK.
    pub fn status(&self) -> Status {
        if self.breaches_critical {
            Status::Critical
        } else if self.breaches_warning {
            Status::Warning
        } else {
            Status::Ok
        }
    }
}
