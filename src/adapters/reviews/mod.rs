//! External review platform adapters.

mod google_reviews;

pub use google_reviews::GoogleReviewSource;
