use axum::{
    response::Html,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{books, courses, posts, reviews, teachers, users, AppState};

const BANNER: &str = "<div style='text-align: center; margin-top: 100px;'><h1>Campus Forum API</h1><p>Use /api to access resources</p></div>";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Html(BANNER) }))
        .route(
            "/api/teacher",
            get(teachers::list_teachers)
                .post(teachers::create_teacher)
                .patch(teachers::update_teacher),
        )
        .route("/api/teacher/:id", get(teachers::get_teacher))
        .route(
            "/api/course",
            get(courses::get_courses).post(courses::create_course),
        )
        .route(
            "/api/review",
            get(reviews::get_reviews)
                .post(reviews::create_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/api/book",
            get(books::list_books)
                .post(books::create_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        .route("/api/book/:id", get(books::get_book).put(books::replace_book))
        .route("/api/post", get(posts::get_posts).post(posts::create_post))
        .route("/api/user", get(users::get_user).put(users::update_user))
        .with_state(state)
}
