//! Origin/destination pairing.

use std::pin::pin;

use futures::{Stream, TryStreamExt};

use crate::domain::{ServiceTime, TripLeg};
use crate::transitland::{ScheduleStopPair, TransitError};

/// Find the destination-side record for `origin`'s trip and combine the
/// two into a [`TripLeg`].
///
/// Records naming a different trip are skipped; the first record for the
/// same trip wins and ends consumption, cancelling any further crawl of
/// `destinations`. Returns `Ok(None)` when the stream runs out without a
/// match or either side is missing a required field; an incomplete pair
/// is "not found", never an error.
pub async fn pair_with_destination<S>(
    origin: &ScheduleStopPair,
    destinations: S,
) -> Result<Option<TripLeg>, TransitError>
where
    S: Stream<Item = Result<ScheduleStopPair, TransitError>>,
{
    let Some(trip) = origin.trip.as_deref() else {
        return Ok(None);
    };

    let mut destinations = pin!(destinations);
    while let Some(destination) = destinations.try_next().await? {
        if destination.trip.as_deref() != Some(trip) {
            continue;
        }
        return Ok(combine(origin, &destination));
    }
    Ok(None)
}

/// Combine the two sides of a trip, folding service-day times back to
/// wall clock ("24:00:00" becomes "00:00:00").
fn combine(origin: &ScheduleStopPair, destination: &ScheduleStopPair) -> Option<TripLeg> {
    let trip_headsign = origin.trip_headsign.clone()?;
    let origin_departure_time = wall_clock(origin.origin_departure_time.as_deref()?)?;
    let destination_arrival_time = wall_clock(destination.destination_arrival_time.as_deref()?)?;
    Some(TripLeg {
        trip_headsign,
        origin_departure_time,
        destination_arrival_time,
    })
}

fn wall_clock(time: &str) -> Option<String> {
    ServiceTime::parse(time).ok().map(|t| t.wall_clock())
}
