//! Shape and content checks on the values returned by a query.

use cellprobe_types::Measurement;
use regex::Regex;
use thiserror::Error;

/// Why a query result cannot be used as a measurement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no value returned")]
    NotFound,

    #[error("{0} values returned where one was expected")]
    Ambiguous(usize),

    #[error("value '{value}' does not match expected regex '{expected}'")]
    PatternMismatch { value: String, expected: String },
}

/// Turn a query result into a [`Measurement`].
///
/// Exactly one value must be present. When `expected` is given the value must
/// contain a match for it (unanchored search).
pub fn validate(
    results: Vec<String>,
    expected: Option<&Regex>,
) -> Result<Measurement, ValidationError> {
    let value = match <[String; 1]>::try_from(results) {
        Ok([value]) => value,
        Err(results) if results.is_empty() => return Err(ValidationError::NotFound),
        Err(results) => return Err(ValidationError::Ambiguous(results.len())),
    };

    if let Some(pattern) = expected {
        if !pattern.is_match(&value) {
            return Err(ValidationError::PatternMismatch {
                value,
                expected: pattern.as_str().to_string(),
            });
        }
    }

    Ok(Measurement::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(validate(vec![], None), Err(ValidationError::NotFound));
        for n in 2..8 {
            let results = vec!["1".to_string(); n];
            assert_eq!(validate(results, None), Err(ValidationError::Ambiguous(n)));
        }
    }

    #[test]
    fn test_single_value() {
        let m = validate(values(&["42.5"]), None).unwrap();
        assert_eq!(m.raw(), "42.5");
        assert_eq!(m.numeric(), Some(42.5));

        let m = validate(values(&["ACTIVE"]), None).unwrap();
        assert!(!m.is_numeric());
    }

    #[test]
    fn test_pattern_is_a_search() {
        let re = Regex::new("TIV").unwrap();
        assert!(validate(values(&["ACTIVE"]), Some(&re)).is_ok());

        let anchored = Regex::new("^ACTIVE$").unwrap();
        assert_eq!(
            validate(values(&["INACTIVE"]), Some(&anchored)),
            Err(ValidationError::PatternMismatch {
                value: "INACTIVE".to_string(),
                expected: "^ACTIVE$".to_string(),
            })
        );
    }

    #[test]
    fn test_cardinality_checked_before_pattern() {
        let re = Regex::new("^x$").unwrap();
        assert_eq!(
            validate(values(&["a", "b"]), Some(&re)),
            Err(ValidationError::Ambiguous(2))
        );
    }
}
