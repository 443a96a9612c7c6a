//! Clock: processing timestamps.

use chrono::Local;

use crate::report::model::TIMESTAMP_FORMAT;

/// Supplies the processing timestamp as `YYYY-MM-DD HH:MM:SS`.
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Always returns the same timestamp. Used by tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_system_clock_format() {
        let now = SystemClock.now();
        assert_eq!(now.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&now, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock("2024-01-01 00:00:00".into());
        assert_eq!(clock.now(), "2024-01-01 00:00:00");
        assert_eq!(clock.now(), clock.now());
    }
}
