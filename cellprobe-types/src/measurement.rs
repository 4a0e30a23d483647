//! A single measured value as returned by a data store.

/// The raw value read by a probe, with its numeric interpretation.
///
/// Created once per check run and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    raw: String,
    numeric: Option<f64>,
}

impl Measurement {
    /// Classify a raw value.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let numeric = parse_number(&raw);
        Self { raw, numeric }
    }

    /// The value exactly as returned.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The numeric value, if the whole string is a finite number.
    pub fn numeric(&self) -> Option<f64> {
        self.numeric
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric.is_some()
    }
}

/// Strict, total numeric parse.
///
/// Succeeds only when the entire string is a finite floating point number.
/// Surrounding whitespace, trailing units and `inf`/`NaN` spellings are all
/// rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() || s.trim() != s {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values() {
        for (raw, expected) in [
            ("42.5", 42.5),
            ("0", 0.0),
            ("-3", -3.0),
            ("+7", 7.0),
            ("1e3", 1000.0),
            (".5", 0.5),
        ] {
            let m = Measurement::new(raw);
            assert_eq!(m.numeric(), Some(expected), "{raw}");
            assert_eq!(m.raw(), raw);
        }
    }

    #[test]
    fn test_non_numeric_values() {
        for raw in [
            "", "ACTIVE", "42.5ms", "42 ", " 42", "NaN", "inf", "-infinity", "1e400", "0x10",
            "1,000",
        ] {
            assert!(!Measurement::new(raw).is_numeric(), "{raw:?}");
        }
    }
}
