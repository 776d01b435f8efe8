//! Service-day window queries.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::domain::OnestopId;
use crate::transitland::{SchedulePage, ScheduleStopPair, TransitClient, TransitError};

/// End of the early-next-day window: trips filed past 24:00 under the
/// anchor date surface in [00:00, 02:00) of the following date.
const NEXT_DAY_WINDOW_END: &str = "02:00";

/// Filters for a schedule window query.
///
/// `origin`, `destination` and `trip` narrow the search. `anchor`
/// overrides the moment the windows start from; when absent, the windows
/// are anchored at the current time in `timezone`.
#[derive(Debug, Clone)]
pub struct ScheduleQuery {
    pub operator: OnestopId,
    pub timezone: Tz,
    pub origin: Option<OnestopId>,
    pub destination: Option<OnestopId>,
    pub trip: Option<String>,
    pub anchor: Option<NaiveDateTime>,
}

impl ScheduleQuery {
    /// Query everything an operator runs from "now" on.
    pub fn new(operator: OnestopId, timezone: Tz) -> Self {
        Self {
            operator,
            timezone,
            origin: None,
            destination: None,
            trip: None,
            anchor: None,
        }
    }

    /// Only records departing from this stop.
    pub fn with_origin(mut self, origin: OnestopId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Only records arriving at this stop.
    pub fn with_destination(mut self, destination: OnestopId) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Only records belonging to this trip.
    pub fn with_trip(mut self, trip: impl Into<String>) -> Self {
        self.trip = Some(trip.into());
        self
    }

    /// Anchor the windows at an explicit local time instead of "now".
    pub fn with_anchor(mut self, anchor: NaiveDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

impl TransitClient {
    /// Stream schedule records covering the rest of the anchor's service
    /// day and the early hours of the next, in that order.
    ///
    /// Feeds encode tonight's post-midnight trips with times of 24:00 and
    /// above under the anchor *date*, so querying the next date for the
    /// same window would miss them. Instead: window 1 is
    /// [anchor time, 24:00) on the anchor date, window 2 is [00:00, 02:00)
    /// on the following date. Each window arrives in the API's ascending
    /// departure-time order and window 1 precedes window 2 on the clock,
    /// so plain concatenation keeps the whole stream ordered.
    pub fn schedule_windows(
        &self,
        query: ScheduleQuery,
    ) -> BoxStream<'static, Result<ScheduleStopPair, TransitError>> {
        let anchor = query
            .anchor
            .unwrap_or_else(|| Utc::now().with_timezone(&query.timezone).naive_local());

        let remainder_url = self.schedule_url(
            &query,
            anchor.date(),
            &format!("{},24:00", anchor.format("%H:%M")),
        );
        let early_url = self.schedule_url(
            &query,
            anchor.date().succ_opt().expect("date overflow"),
            &format!("00:00,{NEXT_DAY_WINDOW_END}"),
        );

        self.entities::<SchedulePage>(remainder_url)
            .chain(self.entities::<SchedulePage>(early_url))
            .boxed()
    }

    pub(crate) fn schedule_url(
        &self,
        query: &ScheduleQuery,
        date: NaiveDate,
        between: &str,
    ) -> String {
        let mut params: Vec<(&str, String)> =
            vec![("sort_key", "origin_departure_time".to_string())];
        if let Some(origin) = &query.origin {
            params.push(("origin_onestop_id", origin.as_str().to_string()));
        }
        if let Some(destination) = &query.destination {
            params.push(("destination_onestop_id", destination.as_str().to_string()));
        }
        params.push(("operator_onestop_id", query.operator.as_str().to_string()));
        if let Some(trip) = &query.trip {
            params.push(("trip", trip.clone()));
        }
        params.push(("date", date.format("%Y-%m-%d").to_string()));
        params.push(("origin_departure_between", between.to_string()));
        self.resource_url("schedule_stop_pairs", &params)
    }
}
