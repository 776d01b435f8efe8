//! Transit.land v1 datastore access.
//!
//! This module provides the HTTP-facing half of the pipeline:
//! - every request is throttled through one shared rate limiter, because
//!   the datastore caps the aggregate request rate per client
//! - list resources are paginated via `meta.next` links and fetched
//!   lazily, one page per consumer pull
//! - a non-success status fails with the raw response body as the message
//!
//! The transport itself is the [`Fetch`] capability; [`mock`] provides a
//! canned implementation for tests and offline use.

mod client;
mod error;
mod fetch;
pub mod mock;
mod pages;
mod types;

pub use client::{TransitClient, TransitConfig};
pub use error::TransitError;
pub use fetch::{Fetch, HttpFetch};
pub use pages::Page;
pub use types::{Meta, Operator, OperatorsPage, SchedulePage, ScheduleStopPair, Stop, StopsPage};
