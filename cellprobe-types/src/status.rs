//! Plugin result status and exit codes.

use core::fmt;

/// Result of a check, as understood by the monitoring supervisor.
///
/// The discriminants are the process exit codes defined by the Nagios plugin
/// API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Status {
    /// Process exit code for this status.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Upper-case label printed at the start of the output line.
    pub const fn label(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Status::Warning.code(), 1);
        assert_eq!(Status::Critical.code(), 2);
        assert_eq!(Status::Unknown.code(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
        assert_eq!(format!("{}: down", Status::Unknown), "UNKNOWN: down");
    }
}
