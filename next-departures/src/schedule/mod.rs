//! Schedule window queries and origin/destination pairing.
//!
//! Transit feeds express post-midnight stops of overnight trips with
//! service-day times of 24:00 and above, filed under the *previous*
//! calendar date. Everything in this module exists to keep that boundary
//! straight: window queries look on both sides of midnight and the pairer
//! folds the notation back to wall clock.

mod pair;
mod window;

pub use pair::pair_with_destination;
pub use window::ScheduleQuery;
