//! Review domain module.
//!
//! Covers imported customer feedback and the drafting state machine.

mod item;

pub use item::{DraftReply, ReviewError, ReviewItem, ReviewStatus, LOW_RATING_THRESHOLD};
