//! Wire types for the transit.land v1 datastore.
//!
//! List responses share one shape: an array keyed by the resource name
//! plus a `meta` object whose `next` field, when present, is the
//! fully-qualified URL of the following page.

use serde::{Deserialize, Serialize};

use crate::domain::OnestopId;
use crate::matching::{MatchProfile, Matchable};

use super::pages::Page;

/// Pagination metadata; absence of `next` ends pagination.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Meta {
    #[serde(default)]
    pub next: Option<String>,
}

/// A transit agency.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Operator {
    pub onestop_id: OnestopId,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: String,
}

/// A physical stop, served by exactly one operator.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Stop {
    pub onestop_id: OnestopId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub operator_onestop_id: Option<OnestopId>,
}

/// One scheduled event record: the origin-side or destination-side half
/// of a leg, as returned by the `schedule_stop_pairs` resource.
///
/// Times are service-day "HH:MM:SS" strings and may exceed 24:00 for
/// post-midnight stops of overnight trips.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScheduleStopPair {
    #[serde(default)]
    pub trip: Option<String>,
    #[serde(default)]
    pub origin_onestop_id: Option<OnestopId>,
    #[serde(default)]
    pub destination_onestop_id: Option<OnestopId>,
    #[serde(default)]
    pub origin_departure_time: Option<String>,
    #[serde(default)]
    pub destination_arrival_time: Option<String>,
    #[serde(default)]
    pub trip_headsign: Option<String>,
}

/// Response page for the `operators` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorsPage {
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Response page for the `stops` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsPage {
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Response page for the `schedule_stop_pairs` resource.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulePage {
    #[serde(default)]
    pub schedule_stop_pairs: Vec<ScheduleStopPair>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl Page for OperatorsPage {
    type Entity = Operator;

    fn next_url(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next.as_deref())
    }

    fn into_entities(self) -> Vec<Operator> {
        self.operators
    }
}

impl Page for StopsPage {
    type Entity = Stop;

    fn next_url(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next.as_deref())
    }

    fn into_entities(self) -> Vec<Stop> {
        self.stops
    }
}

impl Page for SchedulePage {
    type Entity = ScheduleStopPair;

    fn next_url(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next.as_deref())
    }

    fn into_entities(self) -> Vec<ScheduleStopPair> {
        self.schedule_stop_pairs
    }
}

// Operators are usually looked up by their short code ("PATCO"), so the
// short name outweighs the full name. Stop queries are multi-word and
// often partial ("15 16 locust"), so they match token-wise on the name.

impl Matchable for Operator {
    fn profile() -> MatchProfile {
        MatchProfile {
            max_distance: 0.4,
            tokenize: false,
        }
    }

    fn fields(&self) -> Vec<(Option<&str>, f64)> {
        vec![(self.short_name.as_deref(), 0.7), (self.name.as_deref(), 0.3)]
    }
}

impl Matchable for Stop {
    fn profile() -> MatchProfile {
        MatchProfile {
            max_distance: 0.5,
            tokenize: true,
        }
    }

    fn fields(&self) -> Vec<(Option<&str>, f64)> {
        vec![(self.name.as_deref(), 1.0)]
    }
}
