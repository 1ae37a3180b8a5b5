pub mod books;
pub mod connection;
pub mod courses;
pub mod models;
pub mod posts;
pub mod reviews;
pub mod sessions;
pub mod setup;
pub mod teachers;
pub mod users;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_conn() -> DbConn {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::ensure_schema(&mut conn).unwrap();
        conn
    }

    fn add_user(conn: &mut DbConn, email: &str, username: Option<&str>) -> User {
        let profile = NewUser {
            name: email.to_string(),
            email: email.to_string(),
            ..Default::default()
        };
        let student_id = email.split('@').next().unwrap().to_uppercase();
        let user = users::insert_user(conn, &student_id, &profile, Role::User).unwrap();
        users::insert_settings(conn, user.id, email).unwrap();
        if username.is_some() {
            let update = SettingsUpdate {
                username: username.map(str::to_string),
                ..Default::default()
            };
            users::update_settings(conn, user.id, &update).unwrap();
        }
        user
    }

    fn add_course(conn: &mut DbConn) -> (Teacher, Course) {
        let teacher = teachers::insert_teacher(
            conn,
            &NewTeacher {
                name: "Lin".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        let course = courses::insert_course(conn, "Databases", teacher.id).unwrap();
        (teacher, course)
    }

    #[test]
    fn test_ratings_for_course() {
        let mut conn = fresh_conn();
        let (_, course) = add_course(&mut conn);
        let (_, other) = add_course(&mut conn);
        let a = add_user(&mut conn, "d1@school.edu", None);
        let b = add_user(&mut conn, "d2@school.edu", None);

        reviews::insert_review(&mut conn, course.id, a.id, 5, "great").unwrap();
        reviews::insert_review(&mut conn, course.id, b.id, 3, "ok").unwrap();
        reviews::insert_review(&mut conn, other.id, a.id, 1, "meh").unwrap();

        let mut ratings = reviews::list_ratings_for_course(&mut conn, course.id).unwrap();
        ratings.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(ratings, vec![3.0, 5.0]);
    }

    #[test]
    fn test_counts_by_reviewer_use_username_or_student_id() {
        let mut conn = fresh_conn();
        let (_, c1) = add_course(&mut conn);
        let (_, c2) = add_course(&mut conn);
        let named = add_user(&mut conn, "d1@school.edu", Some("bookworm"));
        let unnamed = add_user(&mut conn, "d2@school.edu", None);

        reviews::insert_review(&mut conn, c1.id, named.id, 4, "").unwrap();
        reviews::insert_review(&mut conn, c2.id, named.id, 4, "").unwrap();
        reviews::insert_review(&mut conn, c1.id, unnamed.id, 2, "").unwrap();

        let counts = reviews::count_reviews_by_reviewer(&mut conn).unwrap();
        assert_eq!(
            counts,
            vec![
                crate::rating::ReviewerActivity::new("bookworm", 2),
                crate::rating::ReviewerActivity::new("D2", 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_review_is_skipped() {
        let mut conn = fresh_conn();
        let (_, course) = add_course(&mut conn);
        let user = add_user(&mut conn, "d1@school.edu", None);

        let first = reviews::insert_review(&mut conn, course.id, user.id, 5, "").unwrap();
        assert!(first.is_some());

        let second = reviews::insert_review(&mut conn, course.id, user.id, 4, "").unwrap();
        assert!(second.is_none());
        assert_eq!(reviews::list_ratings_for_course(&mut conn, course.id).unwrap(), vec![5.0]);
    }

    #[test]
    fn test_course_requires_existing_teacher() {
        let mut conn = fresh_conn();
        assert!(courses::insert_course(&mut conn, "Orphan", 999).is_err());
    }

    #[test]
    fn test_teacher_partial_update() {
        let mut conn = fresh_conn();
        let (teacher, _) = add_course(&mut conn);

        let update = TeacherUpdate {
            id: teacher.id,
            expertise: Some("Compilers".to_string()),
            ..Default::default()
        };
        let updated = teachers::update_teacher(&mut conn, &update).unwrap().unwrap();
        assert_eq!(updated.name, "Lin");
        assert_eq!(updated.expertise.as_deref(), Some("Compilers"));

        let missing = TeacherUpdate {
            id: 404,
            ..Default::default()
        };
        assert!(teachers::update_teacher(&mut conn, &missing).unwrap().is_none());
    }

    #[test]
    fn test_teacher_search_matches_substring() {
        let mut conn = fresh_conn();
        for name in ["Chen Wei", "Lin Mei", "Chen Hao"] {
            teachers::insert_teacher(
                &mut conn,
                &NewTeacher {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let found = teachers::search(&mut conn, Some("Chen")).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(teachers::search(&mut conn, None).unwrap().len(), 3);
        assert_eq!(teachers::count_all(&mut conn).unwrap(), 3);
    }

    #[test]
    fn test_teacher_search_treats_wildcards_literally() {
        let mut conn = fresh_conn();
        for name in ["Chen Wei", "Lin Mei", "Wang_Hao"] {
            teachers::insert_teacher(
                &mut conn,
                &NewTeacher {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let found = teachers::search(&mut conn, Some("_")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Wang_Hao");
        assert!(teachers::search(&mut conn, Some("%")).unwrap().is_empty());
        assert!(teachers::search(&mut conn, Some("chen")).unwrap().is_empty());
        assert_eq!(teachers::search(&mut conn, Some("")).unwrap().len(), 3);
    }

    #[test]
    fn test_book_pages_and_partial_update() {
        let mut conn = fresh_conn();
        let seller = add_user(&mut conn, "d7@school.edu", None);
        for n in 0..3 {
            let book = NewBook {
                title: format!("Book {}", n),
                price: 100,
                ..Default::default()
            };
            books::insert_book(&mut conn, seller.id, &book).unwrap();
        }

        let page = books::list_page(&mut conn, Page { limit: 2, offset: 0 }).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title, "Book 2");
        assert_eq!(page[0].user.student_id, "D7");
        assert_eq!(books::count_by_user(&mut conn, seller.id).unwrap(), 3);

        let update = BookUpdate {
            sold: Some(true),
            ..Default::default()
        };
        let updated = books::update_book(&mut conn, page[0].id, &update).unwrap();
        assert!(updated.sold);
        assert_eq!(updated.price, 100);
    }

    #[test]
    fn test_session_expiry() {
        let mut conn = fresh_conn();
        let user = add_user(&mut conn, "d3@school.edu", None);
        let now = chrono::Utc::now().naive_utc();

        sessions::insert_session(&mut conn, "live", user.id, now + chrono::Duration::days(1)).unwrap();
        sessions::insert_session(&mut conn, "stale", user.id, now - chrono::Duration::days(1)).unwrap();

        let live = sessions::find_active(&mut conn, "live", now).unwrap().unwrap();
        assert_eq!(live.user_id, user.id);
        assert_eq!(live.role, Role::User);
        assert!(sessions::find_active(&mut conn, "stale", now).unwrap().is_none());
        assert_eq!(sessions::delete_expired(&mut conn, now).unwrap(), 1);
    }
}
