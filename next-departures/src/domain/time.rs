//! Service-day time handling.
//!
//! GTFS-derived feeds express times as "HH:MM:SS" counted from local
//! midnight of the *service day*, and a trip that runs past midnight keeps
//! counting: 24:10:00 means ten past midnight on the following calendar
//! date, still belonging to the previous day's service. This module keeps
//! the service-day notation while exposing the wall-clock view.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Error returned when parsing an invalid service time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day in service-day notation.
///
/// Hours run from 0 to 47: values of 24 and above represent the
/// continuation of the previous service day past midnight.
///
/// # Examples
///
/// ```
/// use next_departures::domain::ServiceTime;
///
/// let boundary = ServiceTime::parse("24:00:00").unwrap();
/// assert!(boundary.past_midnight());
/// assert_eq!(boundary.wall_clock(), "00:00:00");
///
/// let afternoon = ServiceTime::parse("14:30:00").unwrap();
/// assert!(!afternoon.past_midnight());
/// assert_eq!(afternoon.wall_clock(), "14:30:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl ServiceTime {
    /// Parse "HH:MM:SS" (a single-digit hour is accepted).
    ///
    /// Hours up to 47 are valid; feeds use 24+ for post-midnight stops of
    /// overnight trips.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 {
            return Err(TimeError::new("expected HH:MM:SS"));
        }

        let hour = parse_component(parts[0]).ok_or_else(|| TimeError::new("invalid hour"))?;
        if hour > 47 {
            return Err(TimeError::new("hour must be 0-47"));
        }
        let minute = parse_component(parts[1]).ok_or_else(|| TimeError::new("invalid minute"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        let second = parse_component(parts[2]).ok_or_else(|| TimeError::new("invalid second"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Returns the service-day hour (0-47).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// True for times at or past 24:00, which fall on the calendar date
    /// after their service day.
    pub fn past_midnight(&self) -> bool {
        self.hour >= 24
    }

    /// Wall-clock rendering with the service-day offset folded away:
    /// "24:00:00" becomes "00:00:00".
    pub fn wall_clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour % 24, self.minute, self.second)
    }

    /// Anchor this time on the calendar date of its service day.
    ///
    /// Past-midnight times land on the following date.
    pub fn on_date(&self, service_date: NaiveDate) -> NaiveDateTime {
        let date = if self.past_midnight() {
            service_date.succ_opt().expect("date overflow")
        } else {
            service_date
        };
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour % 24),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .expect("components validated on construction");
        date.and_time(time)
    }
}

fn parse_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}
