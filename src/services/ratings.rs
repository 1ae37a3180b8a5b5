use anyhow::Result;

use crate::database::{self, Course, DbConn, Teacher};
use crate::rating::{self, RankedEntry, RatingSummary, TeacherRatingSummary};

#[derive(Debug, Clone)]
pub struct CourseRating {
    pub course: Course,
    pub summary: RatingSummary,
}

#[derive(Debug, Clone)]
pub struct TeacherRating {
    pub teacher: Teacher,
    pub summary: TeacherRatingSummary,
}

/// `None` when the course does not exist; nothing is aggregated in that case.
pub fn course_rating(conn: &mut DbConn, course_id: i64) -> Result<Option<CourseRating>> {
    let Some(course) = database::courses::find_by_id(conn, course_id)? else {
        return Ok(None);
    };

    rate_course(conn, course).map(Some)
}

pub fn courses_with_ratings(conn: &mut DbConn, teacher_id: i64) -> Result<Vec<CourseRating>> {
    database::courses::list_by_teacher(conn, teacher_id)?
        .into_iter()
        .map(|course| rate_course(conn, course))
        .collect()
}

/// `None` when the teacher does not exist.
pub fn teacher_rating(conn: &mut DbConn, teacher_id: i64) -> Result<Option<TeacherRating>> {
    let Some(teacher) = database::teachers::find_by_id(conn, teacher_id)? else {
        return Ok(None);
    };

    let course_summaries: Vec<RatingSummary> = courses_with_ratings(conn, teacher.id)?
        .into_iter()
        .map(|c| c.summary)
        .collect();

    Ok(Some(TeacherRating {
        teacher,
        summary: rating::aggregate_teacher(&course_summaries),
    }))
}

pub fn reviewer_leaderboard(conn: &mut DbConn) -> Result<Vec<RankedEntry>> {
    let activities = database::reviews::count_reviews_by_reviewer(conn)?;
    Ok(rating::rank(activities))
}

fn rate_course(conn: &mut DbConn, course: Course) -> Result<CourseRating> {
    let ratings = database::reviews::list_ratings_for_course(conn, course.id)?;

    Ok(CourseRating {
        course,
        summary: rating::aggregate(&ratings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup, NewTeacher, NewUser, Role};

    struct Fixture {
        conn: DbConn,
        next_user: u32,
    }

    impl Fixture {
        fn new() -> Self {
            let pool = create_memory_pool().unwrap();
            let mut conn = get_connection(&pool).unwrap();
            setup::ensure_schema(&mut conn).unwrap();
            Self { conn, next_user: 0 }
        }

        fn teacher(&mut self) -> i64 {
            let teacher = NewTeacher {
                name: "Wang".to_string(),
                ..Default::default()
            };
            database::teachers::insert_teacher(&mut self.conn, &teacher).unwrap().id
        }

        fn course(&mut self, teacher_id: i64) -> i64 {
            database::courses::insert_course(&mut self.conn, "Algorithms", teacher_id)
                .unwrap()
                .id
        }

        fn review(&mut self, course_id: i64, rating: i32) -> i64 {
            self.next_user += 1;
            let email = format!("d{}@school.edu", self.next_user);
            let profile = NewUser {
                name: email.clone(),
                email: email.clone(),
                ..Default::default()
            };
            let user = database::users::insert_user(&mut self.conn, &email, &profile, Role::User)
                .unwrap();
            database::reviews::insert_review(&mut self.conn, course_id, user.id, rating, "")
                .unwrap();
            user.id
        }
    }

    #[test]
    fn test_course_rating_summarizes_reviews() {
        let mut fx = Fixture::new();
        let teacher = fx.teacher();
        let course = fx.course(teacher);
        for r in [5, 5, 4] {
            fx.review(course, r);
        }

        let rated = course_rating(&mut fx.conn, course).unwrap().unwrap();
        assert_eq!(rated.summary.count, 3);
        assert_eq!(rated.summary.average, 4.7);
    }

    #[test]
    fn test_unknown_course_and_teacher_are_not_found() {
        let mut fx = Fixture::new();

        assert!(course_rating(&mut fx.conn, 42).unwrap().is_none());
        assert!(teacher_rating(&mut fx.conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_teacher_rating_averages_course_averages() {
        let mut fx = Fixture::new();
        let teacher = fx.teacher();
        let first = fx.course(teacher);
        let second = fx.course(teacher);
        fx.review(first, 3);
        fx.review(first, 5);
        fx.review(second, 5);

        let rated = teacher_rating(&mut fx.conn, teacher).unwrap().unwrap();
        assert_eq!(rated.summary.average_rating, 4.5);
        assert_eq!(rated.summary.course_count, 2);
        assert_eq!(rated.summary.total_rating, 3);
    }

    #[test]
    fn test_teacher_without_courses_has_zero_rating() {
        let mut fx = Fixture::new();
        let teacher = fx.teacher();

        let rated = teacher_rating(&mut fx.conn, teacher).unwrap().unwrap();
        assert_eq!(rated.summary.course_count, 0);
        assert_eq!(rated.summary.average_rating, 0.0);
    }

    #[test]
    fn test_leaderboard_ranks_reviewers() {
        let mut fx = Fixture::new();
        let teacher = fx.teacher();
        let courses: Vec<i64> = (0..3).map(|_| fx.course(teacher)).collect();
        let busy = fx.review(courses[0], 4);
        database::reviews::insert_review(&mut fx.conn, courses[1], busy, 4, "").unwrap();
        database::reviews::insert_review(&mut fx.conn, courses[2], busy, 4, "").unwrap();
        fx.review(courses[0], 2);
        fx.review(courses[1], 2);

        let board = reviewer_leaderboard(&mut fx.conn).unwrap();
        let ranks: Vec<(u32, u32)> = board.iter().map(|e| (e.review_count, e.rank)).collect();
        assert_eq!(ranks, vec![(3, 1), (1, 2), (1, 2)]);
    }
}
