//! Fuzzy entity resolution with lookup-table fallback.
//!
//! Free-text terms become concrete operators and stops here. Resolution
//! never errors on "nothing matched": that outcome is `Ok(None)`, distinct
//! from a transport failure, so downstream stages can short-circuit to an
//! empty answer instead of failing.

mod lookup;

pub use lookup::LookupTable;

use chrono_tz::Tz;
use futures::TryStreamExt;
use tracing::debug;

use crate::domain::OnestopId;
use crate::matching;
use crate::transitland::{Operator, OperatorsPage, Stop, StopsPage, TransitClient, TransitError};

/// The resolved endpoints of a journey on one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct StopPair {
    /// Local timezone, taken from the origin stop.
    pub timezone: Tz,
    pub operator_onestop_id: OnestopId,
    pub origin_onestop_id: OnestopId,
    pub destination_onestop_id: OnestopId,
}

impl TransitClient {
    /// Resolve a free-text operator term to the best-matching operator.
    ///
    /// The lookup table short-circuits without a network call. Otherwise
    /// the global operator list is crawled and ranked page by page; the
    /// crawl stops at the first page with a hit, so a term found early
    /// never pays for the whole list.
    pub async fn resolve_operator(&self, term: &str) -> Result<Option<Operator>, TransitError> {
        if let Some(operator) = self.lookup.operator(term) {
            debug!(term, onestop_id = %operator.onestop_id, "operator lookup hit");
            return Ok(Some(operator.clone()));
        }

        let mut pages = self.pages::<OperatorsPage>(self.operators_url());
        while let Some(page) = pages.try_next().await? {
            if let Some(best) = matching::rank(term, page.operators).into_iter().next() {
                debug!(term, onestop_id = %best.onestop_id, "operator resolved");
                return Ok(Some(best));
            }
        }
        Ok(None)
    }

    /// Resolve a stop term against the stops served by one operator.
    pub async fn resolve_stop(
        &self,
        term: &str,
        served_by: &OnestopId,
    ) -> Result<Option<Stop>, TransitError> {
        if let Some(stop) = self.lookup.stop(term) {
            debug!(term, onestop_id = %stop.onestop_id, "stop lookup hit");
            return Ok(Some(stop.clone()));
        }

        let mut pages = self.pages::<StopsPage>(self.stops_url(served_by));
        while let Some(page) = pages.try_next().await? {
            if let Some(best) = matching::rank(term, page.stops).into_iter().next() {
                debug!(term, onestop_id = %best.onestop_id, "stop resolved");
                return Ok(Some(best));
            }
        }
        Ok(None)
    }

    /// Resolve origin and destination stop terms concurrently.
    ///
    /// Both resolutions run against the same operator and join before
    /// anything is emitted; if either side finds nothing the whole pair is
    /// `None`, never a half-filled record.
    pub async fn resolve_stop_pair(
        &self,
        operator: &Operator,
        from_term: &str,
        to_term: &str,
    ) -> Result<Option<StopPair>, TransitError> {
        let (origin, destination) = tokio::try_join!(
            self.resolve_stop(from_term, &operator.onestop_id),
            self.resolve_stop(to_term, &operator.onestop_id),
        )?;
        let (Some(origin), Some(destination)) = (origin, destination) else {
            return Ok(None);
        };

        // Stops occasionally come back without a timezone; the operator's
        // zone is the service-correct fallback.
        let zone = if origin.timezone.is_empty() {
            &operator.timezone
        } else {
            &origin.timezone
        };
        let timezone = zone
            .parse()
            .map_err(|_| TransitError::Data(format!("unknown timezone {zone:?}")))?;

        Ok(Some(StopPair {
            timezone,
            operator_onestop_id: operator.onestop_id.clone(),
            origin_onestop_id: origin.onestop_id,
            destination_onestop_id: destination.onestop_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::transitland::mock::MockFetch;
    use crate::transitland::{TransitConfig, TransitError};

    use super::*;

    fn mock_client() -> (Arc<MockFetch>, TransitClient) {
        let mock = Arc::new(MockFetch::new());
        let client = TransitClient::with_fetch(TransitConfig::default(), mock.clone());
        (mock, client)
    }

    fn patco_value() -> serde_json::Value {
        json!({
            "onestop_id": "o-dr4e-portauthoritytransitcorporation",
            "short_name": "PATCO",
            "name": "Port Authority Transit Corporation",
            "timezone": "America/New_York"
        })
    }

    fn patco_operator() -> Operator {
        serde_json::from_value(patco_value()).unwrap()
    }

    fn patco_stops_value() -> serde_json::Value {
        json!({
            "stops": [
                {
                    "onestop_id": "s-dr4durps7v-haddonfield",
                    "name": "Haddonfield",
                    "timezone": "America/New_York"
                },
                {
                    "onestop_id": "s-dr4dv05cxp-ashland",
                    "name": "Ashland",
                    "timezone": "America/New_York"
                },
                {
                    "onestop_id": "s-dr4dtm3ecg-woodcrest",
                    "name": "Woodcrest",
                    "timezone": "America/New_York"
                }
            ]
        })
    }

    #[tokio::test]
    async fn lookup_hit_issues_no_requests() {
        let (mock, client) = mock_client();
        let client = client.with_lookup(LookupTable::new().with_operator("patco", patco_operator()));

        let operator = client.resolve_operator("patco").await.unwrap().unwrap();
        assert_eq!(operator.short_name.as_deref(), Some("PATCO"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn resolves_operator_and_stops_crawling_at_the_first_hit() {
        let (mock, client) = mock_client();
        let first = client.operators_url();
        let second = format!("{first}&offset=50");
        let third = format!("{first}&offset=100");
        mock.serve(
            &first,
            &json!({
                "operators": [
                    {
                        "onestop_id": "o-drt2-mbta",
                        "short_name": "MBTA",
                        "name": "Massachusetts Bay Transportation Authority",
                        "timezone": "America/New_York"
                    }
                ],
                "meta": { "next": second.as_str() }
            }),
        );
        mock.serve(
            &second,
            &json!({
                "operators": [patco_value()],
                "meta": { "next": third.as_str() }
            }),
        );

        let operator = client.resolve_operator("patco").await.unwrap().unwrap();
        assert_eq!(
            operator.onestop_id.as_str(),
            "o-dr4e-portauthoritytransitcorporation"
        );
        // The hit was on page two; page three is never requested.
        assert_eq!(mock.requests(), vec![first, second]);
    }

    #[tokio::test]
    async fn unmatched_operator_term_is_none_not_error() {
        let (mock, client) = mock_client();
        let url = client.operators_url();
        mock.serve(
            &url,
            &json!({
                "operators": [
                    {
                        "onestop_id": "o-drt2-mbta",
                        "short_name": "MBTA",
                        "name": "Massachusetts Bay Transportation Authority",
                        "timezone": "America/New_York"
                    }
                ]
            }),
        );

        assert!(client.resolve_operator("zzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolves_stop_served_by_operator() {
        let (mock, client) = mock_client();
        let operator = patco_operator();
        mock.serve(client.stops_url(&operator.onestop_id), &patco_stops_value());

        let stop = client
            .resolve_stop("haddonfeld", &operator.onestop_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stop.onestop_id.as_str(), "s-dr4durps7v-haddonfield");
    }

    #[tokio::test]
    async fn stop_pair_resolves_both_sides_concurrently() {
        let (mock, client) = mock_client();
        let operator = patco_operator();
        mock.serve(client.stops_url(&operator.onestop_id), &patco_stops_value());

        let pair = client
            .resolve_stop_pair(&operator, "haddonfield", "ashland")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(pair.timezone, chrono_tz::America::New_York);
        assert_eq!(
            pair.operator_onestop_id.as_str(),
            "o-dr4e-portauthoritytransitcorporation"
        );
        assert_eq!(pair.origin_onestop_id.as_str(), "s-dr4durps7v-haddonfield");
        assert_eq!(pair.destination_onestop_id.as_str(), "s-dr4dv05cxp-ashland");
    }

    #[tokio::test]
    async fn stop_pair_with_unmatchable_destination_is_none() {
        let (mock, client) = mock_client();
        let operator = patco_operator();
        mock.serve(client.stops_url(&operator.onestop_id), &patco_stops_value());

        let pair = client
            .resolve_stop_pair(&operator, "haddonfield", "zzzzzz")
            .await
            .unwrap();
        // No partial record with an unresolved destination.
        assert!(pair.is_none());
    }

    #[tokio::test]
    async fn transport_failure_propagates_instead_of_reading_as_not_found() {
        let (mock, client) = mock_client();
        let operator = patco_operator();
        mock.serve_error(
            client.stops_url(&operator.onestop_id),
            500,
            "internal error",
        );

        let err = client
            .resolve_stop("haddonfield", &operator.onestop_id)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn unknown_timezone_is_a_data_error() {
        let (mock, client) = mock_client();
        let operator = patco_operator();
        mock.serve(
            client.stops_url(&operator.onestop_id),
            &json!({
                "stops": [
                    {
                        "onestop_id": "s-dr4durps7v-haddonfield",
                        "name": "Haddonfield",
                        "timezone": "Mars/Olympus"
                    },
                    {
                        "onestop_id": "s-dr4dv05cxp-ashland",
                        "name": "Ashland",
                        "timezone": "Mars/Olympus"
                    }
                ]
            }),
        );

        let err = client
            .resolve_stop_pair(&operator, "haddonfield", "ashland")
            .await
            .unwrap_err();
        assert!(matches!(err, TransitError::Data(_)));
    }
}
