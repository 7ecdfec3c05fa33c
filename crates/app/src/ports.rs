//! Port definitions: traits that adapters implement.
//!
//! The only outside-world input the use-cases need is the current time;
//! everything else is passed in explicitly.

pub mod clock;

pub use clock::{Clock, FixedClock};
