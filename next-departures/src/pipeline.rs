//! The resolution-to-departures pipeline.
//!
//! Composes the pieces end to end: resolve the operator term, resolve both
//! stop terms, enumerate upcoming departures from the origin, and pair
//! each with its destination-side record. Results are collected into a
//! first batch bounded by both a count and a time budget: the time bound
//! guarantees an answer even under slow upstream pagination, the count
//! bound stops the crawl as soon as enough matches exist.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use futures::TryStreamExt;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use crate::domain::{ServiceTime, TripLeg};
use crate::resolve::StopPair;
use crate::schedule::{ScheduleQuery, pair_with_destination};
use crate::transitland::{ScheduleStopPair, TransitClient, TransitError};

/// Bounds on the first result batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Stop after this many legs.
    pub count: usize,
    /// ... and never spend longer than this assembling them.
    pub time_budget: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 5,
            time_budget: Duration::from_secs(3),
        }
    }
}

impl TransitClient {
    /// Next departures between two fuzzily-named stops of an operator.
    ///
    /// Returns the first batch of paired legs, bounded by
    /// [`BatchConfig::default`]. An unresolvable operator or stop term
    /// yields an empty batch ("not found" is an empty answer, not an
    /// error), while transport failures propagate to the caller.
    pub async fn find_next_departures(
        &self,
        operator_term: &str,
        from_term: &str,
        to_term: &str,
    ) -> Result<Vec<TripLeg>, TransitError> {
        self.next_departure_batch(operator_term, from_term, to_term, None, BatchConfig::default())
            .await
    }

    /// Same as [`find_next_departures`](Self::find_next_departures), but
    /// anchored at an explicit local time instead of "now". The time is
    /// interpreted in the operator's timezone.
    pub async fn find_next_departures_at(
        &self,
        operator_term: &str,
        from_term: &str,
        to_term: &str,
        depart_at: NaiveDateTime,
    ) -> Result<Vec<TripLeg>, TransitError> {
        self.next_departure_batch(
            operator_term,
            from_term,
            to_term,
            Some(depart_at),
            BatchConfig::default(),
        )
        .await
    }

    /// Fully-parameterised pipeline entry point.
    pub async fn next_departure_batch(
        &self,
        operator_term: &str,
        from_term: &str,
        to_term: &str,
        depart_at: Option<NaiveDateTime>,
        batch: BatchConfig,
    ) -> Result<Vec<TripLeg>, TransitError> {
        let Some(operator) = self.resolve_operator(operator_term).await? else {
            debug!(operator_term, "no operator matched");
            return Ok(Vec::new());
        };
        let Some(pair) = self.resolve_stop_pair(&operator, from_term, to_term).await? else {
            debug!(from_term, to_term, "stop pair did not resolve");
            return Ok(Vec::new());
        };
        collect_batch(self.departures(pair, depart_at), batch).await
    }

    /// Lazy stream of paired legs for already-resolved endpoints.
    ///
    /// The origin-side crawl is not filtered by destination, because a
    /// record only names the next stop of its trip. Instead, each
    /// departure is paired by re-querying its specific trip on the
    /// destination side, anchored at that departure.
    pub fn departures(
        &self,
        pair: StopPair,
        depart_at: Option<NaiveDateTime>,
    ) -> BoxStream<'static, Result<TripLeg, TransitError>> {
        let anchor = depart_at
            .unwrap_or_else(|| Utc::now().with_timezone(&pair.timezone).naive_local());
        let service_date = anchor.date();

        let origin_query = ScheduleQuery::new(pair.operator_onestop_id.clone(), pair.timezone)
            .with_origin(pair.origin_onestop_id.clone())
            .with_anchor(anchor);

        let client = self.clone();
        let timezone = pair.timezone;
        let operator = pair.operator_onestop_id;
        let destination = pair.destination_onestop_id;

        self.schedule_windows(origin_query)
            .try_filter_map(move |origin| {
                let client = client.clone();
                let operator = operator.clone();
                let destination = destination.clone();
                async move {
                    let Some(trip) = origin.trip.clone() else {
                        return Ok(None);
                    };
                    let Some(anchor) = departure_anchor(&origin, service_date) else {
                        return Ok(None);
                    };
                    let query = ScheduleQuery::new(operator, timezone)
                        .with_destination(destination)
                        .with_trip(trip)
                        .with_anchor(anchor);
                    pair_with_destination(&origin, client.schedule_windows(query)).await
                }
            })
            .boxed()
    }
}

/// Anchor a destination-side query at the origin's departure.
///
/// Past-midnight departures (hours of 24 and above) anchor on the next
/// calendar date; records without a parsable departure are skipped.
fn departure_anchor(origin: &ScheduleStopPair, service_date: NaiveDate) -> Option<NaiveDateTime> {
    let time = ServiceTime::parse(origin.origin_departure_time.as_deref()?).ok()?;
    Some(time.on_date(service_date))
}

/// Drain `legs` until the count bound or the time budget, whichever
/// comes first. Dropping the stream on return cancels any in-flight
/// pagination upstream.
async fn collect_batch(
    mut legs: BoxStream<'_, Result<TripLeg, TransitError>>,
    batch: BatchConfig,
) -> Result<Vec<TripLeg>, TransitError> {
    let mut collected = Vec::new();
    let deadline = tokio::time::sleep(batch.time_budget);
    tokio::pin!(deadline);

    while collected.len() < batch.count {
        tokio::select! {
            item = legs.try_next() => match item? {
                Some(leg) => collected.push(leg),
                None => break,
            },
            () = &mut deadline => {
                debug!(collected = collected.len(), "batch time budget elapsed");
                break;
            }
        }
    }
    Ok(collected)
}
