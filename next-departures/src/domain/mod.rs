//! Domain types for the departure pipeline.
//!
//! These types enforce their invariants at construction time, so code that
//! receives them can trust their validity: a `OnestopId` is always a
//! well-formed registry identifier and a `ServiceTime` always names a real
//! moment of a service day.

mod ids;
mod leg;
mod time;

pub use ids::{InvalidOnestopId, OnestopId};
pub use leg::TripLeg;
pub use time::{ServiceTime, TimeError};
