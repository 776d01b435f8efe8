//! Pre-seeded term lookup.
//!
//! Hosts that already know their operators and stops can skip the network
//! round-trips by seeding this table; it is consulted before any fetch and
//! a missing entry just falls through to the API. The table is supplied by
//! the host at construction and read-only from then on; there is no
//! compiled-in state and no writer at pipeline runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transitland::{Operator, Stop};

/// Term → entity lookup consulted before hitting the API.
///
/// Terms match case-insensitively on their trimmed form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupTable {
    #[serde(default)]
    operators: HashMap<String, Operator>,
    #[serde(default)]
    stops: HashMap<String, Stop>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an operator under `term`.
    pub fn with_operator(mut self, term: impl Into<String>, operator: Operator) -> Self {
        self.operators.insert(normalize(&term.into()), operator);
        self
    }

    /// Seed a stop under `term`.
    pub fn with_stop(mut self, term: impl Into<String>, stop: Stop) -> Self {
        self.stops.insert(normalize(&term.into()), stop);
        self
    }

    /// Look up a previously seeded operator.
    pub fn operator(&self, term: &str) -> Option<&Operator> {
        self.operators.get(&normalize(term))
    }

    /// Look up a previously seeded stop.
    pub fn stop(&self, term: &str) -> Option<&Stop> {
        self.stops.get(&normalize(term))
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty() && self.stops.is_empty()
    }
}

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OnestopId;

    fn patco() -> Operator {
        Operator {
            onestop_id: OnestopId::parse("o-dr4e-portauthoritytransitcorporation").unwrap(),
            short_name: Some("PATCO".to_string()),
            name: Some("Port Authority Transit Corporation".to_string()),
            timezone: "America/New_York".to_string(),
        }
    }

    #[test]
    fn empty_by_default() {
        let table = LookupTable::new();
        assert!(table.is_empty());
        assert!(table.operator("patco").is_none());
        assert!(table.stop("haddonfield").is_none());
    }

    #[test]
    fn seeded_operator_is_found() {
        let table = LookupTable::new().with_operator("patco", patco());
        assert_eq!(
            table.operator("patco").and_then(|o| o.short_name.as_deref()),
            Some("PATCO")
        );
    }

    #[test]
    fn terms_match_case_insensitively_and_trimmed() {
        let table = LookupTable::new().with_operator("PATCO ", patco());
        assert!(table.operator("  patco").is_some());
        assert!(table.operator("Patco").is_some());
        assert!(table.operator("septa").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let table = LookupTable::new().with_operator("patco", patco());
        let json = serde_json::to_string(&table).unwrap();
        let back: LookupTable = serde_json::from_str(&json).unwrap();
        assert!(back.operator("patco").is_some());
    }
}
