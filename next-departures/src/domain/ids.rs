//! Onestop identifier type.

use std::fmt;

/// Error returned when parsing an invalid Onestop ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Onestop ID: {reason}")]
pub struct InvalidOnestopId {
    reason: &'static str,
}

/// A Onestop ID as used by the transit.land registry.
///
/// IDs have the shape `<prefix>-<geohash>-<name>`: a single lowercase
/// letter naming the entity kind (`o` operator, `s` stop, `r` route), a
/// geohash, and a name which may itself contain further dashes.
///
/// # Examples
///
/// ```
/// use next_departures::domain::OnestopId;
///
/// let id = OnestopId::parse("o-dr4e-portauthoritytransitcorporation").unwrap();
/// assert_eq!(id.as_str(), "o-dr4e-portauthoritytransitcorporation");
///
/// // Missing parts are rejected
/// assert!(OnestopId::parse("o-dr4e").is_err());
/// assert!(OnestopId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OnestopId(String);

impl OnestopId {
    /// Parse a Onestop ID from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidOnestopId> {
        let mut parts = s.splitn(3, '-');
        let prefix = parts.next().unwrap_or_default();
        let geohash = parts.next().ok_or(InvalidOnestopId {
            reason: "expected <prefix>-<geohash>-<name>",
        })?;
        let name = parts.next().ok_or(InvalidOnestopId {
            reason: "expected <prefix>-<geohash>-<name>",
        })?;

        if prefix.len() != 1 || !prefix.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(InvalidOnestopId {
                reason: "prefix must be a single lowercase letter",
            });
        }
        if geohash.is_empty() {
            return Err(InvalidOnestopId {
                reason: "geohash part must be non-empty",
            });
        }
        if name.is_empty() {
            return Err(InvalidOnestopId {
                reason: "name part must be non-empty",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OnestopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnestopId({})", self.0)
    }
}

impl fmt::Display for OnestopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OnestopId {
    type Error = InvalidOnestopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<OnestopId> for String {
    fn from(id: OnestopId) -> Self {
        id.0
    }
}
