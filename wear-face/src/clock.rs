//! Wall-clock boundary.
//!
//! Time is read through a trait so frame composition and tick scheduling are
//! testable with a manual clock. The real clock derives its civil breakdown
//! from the system's local timezone on every read, which is what makes a
//! timezone change a pure "redraw now" event - there is no cached format
//! state to refresh.

use std::sync::{Arc, Mutex};

use chrono::{Datelike, Local, Timelike};

/// One wall-clock reading with its civil breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallTime {
    /// Milliseconds since the Unix epoch.
    pub millis: u64,
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
    /// Weekday + medium date line, e.g. "Fri, Aug 28, 2026".
    pub date_line: String,
}

/// Source of wall-clock readings.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> WallTime;
}

/// The system clock in the device's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        let now = Local::now();
        WallTime {
            millis: now.timestamp_millis().max(0) as u64,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
            date_line: format!(
                "{}, {} {}, {}",
                now.weekday(),
                month_abbrev(now.month()),
                now.day(),
                now.year()
            ),
        }
    }
}

/// English month abbreviation. Localizing the date line is out of scope;
/// platform backends substitute their own formatter.
fn month_abbrev(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS[(month as usize - 1).min(11)]
}

/// A hand-driven clock for tests. Clones share the same reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<WallTime>>,
}

impl ManualClock {
    /// Start the clock at the given reading.
    pub fn starting_at(time: WallTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(time)),
        }
    }

    /// Replace the current reading.
    pub fn set(&self, time: WallTime) {
        *self.inner.lock().unwrap() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> WallTime {
        self.inner.lock().unwrap().clone()
    }
}

impl WallTime {
    /// Convenience constructor for tests.
    pub fn at(millis: u64, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            millis,
            hour,
            minute,
            second,
            date_line: "Fri, Aug 28, 2026".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_produces_sane_fields() {
        let now = SystemClock.now();
        assert!(now.hour < 24);
        assert!(now.minute < 60);
        assert!(now.second < 60);
        assert!(now.millis > 0);
        assert!(now.date_line.contains(','));
    }

    #[test]
    fn manual_clock_clones_share_readings() {
        let clock = ManualClock::starting_at(WallTime::at(1_000, 10, 30, 0));
        let other = clock.clone();

        clock.set(WallTime::at(2_000, 10, 30, 1));
        assert_eq!(other.now().second, 1);
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(month_abbrev(1), "Jan");
        assert_eq!(month_abbrev(12), "Dec");
    }
}
