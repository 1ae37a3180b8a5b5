pub type RatingValue = f64;

/// Review count and rounded mean of one set of ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub count: usize,
    pub average: RatingValue,
}

impl RatingSummary {
    pub fn empty() -> Self {
        Self {
            count: 0,
            average: 0.0,
        }
    }
}

/// Teacher-level figures built from the summaries of each of their courses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeacherRatingSummary {
    /// Number of courses that went into the average, reviewed or not.
    pub course_count: usize,
    /// Reviews summed over every course.
    pub total_rating: usize,
    pub average_rating: RatingValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerActivity {
    pub identity: String,
    pub review_count: u32,
}

impl ReviewerActivity {
    pub fn new(identity: impl Into<String>, review_count: u32) -> Self {
        Self {
            identity: identity.into(),
            review_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub identity: String,
    pub review_count: u32,
    pub rank: u32,
}
