use super::types::{RatingSummary, RatingValue, TeacherRatingSummary};

/// Counts the ratings and averages them to one decimal place.
///
/// An empty input is a valid zero state, never a division by zero.
pub fn aggregate(ratings: &[RatingValue]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary::empty();
    }

    let count = ratings.len();
    let sum: RatingValue = ratings.iter().sum();

    RatingSummary {
        count,
        average: round_to_tenth(sum / count as RatingValue),
    }
}

/// Averages the (already rounded) per-course averages of one teacher.
///
/// This is a mean of means: every course weighs the same regardless of how
/// many reviews it has, and unreviewed courses count with an average of 0.
pub fn aggregate_teacher(courses: &[RatingSummary]) -> TeacherRatingSummary {
    let course_averages: Vec<RatingValue> = courses.iter().map(|c| c.average).collect();
    let overall = aggregate(&course_averages);

    TeacherRatingSummary {
        course_count: overall.count,
        total_rating: courses.iter().map(|c| c.count).sum(),
        average_rating: overall.average,
    }
}

/// Half away from zero on the tenth digit.
fn round_to_tenth(value: RatingValue) -> RatingValue {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ratings_give_zero_summary() {
        let summary = aggregate(&[]);

        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, 0.0);
    }

    #[test]
    fn test_exact_average() {
        let summary = aggregate(&[5.0, 3.0, 4.0]);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 4.0);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        assert_eq!(aggregate(&[5.0, 5.0, 4.0]).average, 4.7);
        assert_eq!(aggregate(&[4.0, 4.0, 5.0]).average, 4.3);
        assert_eq!(aggregate(&[1.0, 2.0]).average, 1.5);
        // 3.25 sits exactly on the midpoint and rounds up
        assert_eq!(aggregate(&[3.0, 3.5]).average, 3.3);
    }

    #[test]
    fn test_average_stays_within_bounds() {
        let samples: [&[f64]; 5] = [
            &[1.0],
            &[1.0, 5.0],
            &[2.0, 2.0, 3.0, 5.0],
            &[4.0, 4.0, 4.0, 5.0, 5.0, 1.0, 3.0],
            &[5.0, 5.0, 5.0, 5.0, 4.0],
        ];

        for ratings in samples {
            let summary = aggregate(ratings);
            let min = ratings.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = ratings.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(
                summary.average >= min && summary.average <= max,
                "{:?} averaged to {}",
                ratings,
                summary.average
            );
        }
    }

    #[test]
    fn test_teacher_average_is_mean_of_course_means() {
        let course1 = aggregate(&[3.0, 5.0]);
        let course2 = aggregate(&[5.0]);
        assert_eq!(course1.average, 4.0);

        let teacher = aggregate_teacher(&[course1, course2]);

        assert_eq!(teacher.average_rating, 4.5);
        assert_eq!(teacher.course_count, 2);
        assert_eq!(teacher.total_rating, 3);
        // flat average over the three underlying ratings differs
        assert_ne!(aggregate(&[3.0, 5.0, 5.0]).average, teacher.average_rating);
    }

    #[test]
    fn test_teacher_counts_unreviewed_courses_as_zero() {
        let reviewed = aggregate(&[4.0, 4.0]);
        let unreviewed = aggregate(&[]);

        let teacher = aggregate_teacher(&[reviewed, unreviewed]);

        assert_eq!(teacher.course_count, 2);
        assert_eq!(teacher.total_rating, 2);
        assert_eq!(teacher.average_rating, 2.0);
    }

    #[test]
    fn test_teacher_without_courses() {
        let teacher = aggregate_teacher(&[]);

        assert_eq!(teacher.course_count, 0);
        assert_eq!(teacher.total_rating, 0);
        assert_eq!(teacher.average_rating, 0.0);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let ratings = [2.0, 5.0, 4.0, 4.0];
        assert_eq!(aggregate(&ratings), aggregate(&ratings));
    }
}
