//! Next-departure lookup against the transit.land datastore.
//!
//! Answers "when do the next trains leave here for there?", going from
//! three free-text names (operator, origin stop, destination stop) to
//! paired departure/arrival times, over a paginated, rate-limited public
//! API.

pub mod domain;
pub mod limiter;
pub mod matching;
pub mod pipeline;
pub mod resolve;
pub mod schedule;
pub mod transitland;
