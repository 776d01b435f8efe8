//! The paired result the pipeline produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One upcoming departure, combined from the origin-side and
/// destination-side schedule records of a single trip.
///
/// Times are wall-clock "HH:MM:SS" strings; the service-day notation used
/// by the feed (hours of 24 and above) has already been folded away, so an
/// arrival one minute past midnight reads "00:01:00".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLeg {
    /// Headsign shown on the vehicle at the origin stop.
    pub trip_headsign: String,
    /// Departure from the origin stop.
    pub origin_departure_time: String,
    /// Arrival at the destination stop.
    pub destination_arrival_time: String,
}

impl fmt::Display for TripLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}  {}",
            self.origin_departure_time, self.destination_arrival_time, self.trip_headsign
        )
    }
}
