pub mod aggregate;
pub mod leaderboard;
pub mod types;

pub use aggregate::{aggregate, aggregate_teacher};
pub use leaderboard::rank;
pub use types::{RankedEntry, RatingSummary, ReviewerActivity, TeacherRatingSummary};
