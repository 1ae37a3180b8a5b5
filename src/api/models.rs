use chrono::NaiveDateTime;
use serde::Serialize;

use crate::database::{PostWithAuthor, UserSettings};
use crate::rating::RankedEntry;
use crate::services::ratings::{CourseRating, TeacherRating};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDetail {
    pub id: i64,
    pub name: String,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub education: Option<String>,
    pub expertise: Option<String>,
    /// Reviews across all of the teacher's courses.
    pub total_rating: usize,
    pub course_count: usize,
    pub average_rating: f64,
}

impl From<TeacherRating> for TeacherDetail {
    fn from(rated: TeacherRating) -> Self {
        let TeacherRating { teacher, summary } = rated;
        Self {
            id: teacher.id,
            name: teacher.name,
            picture: teacher.picture,
            email: teacher.email,
            education: teacher.education,
            expertise: teacher.expertise,
            total_rating: summary.total_rating,
            course_count: summary.course_count,
            average_rating: summary.average_rating,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListItem {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    pub total_rating: usize,
    pub average_rating: f64,
}

impl From<CourseRating> for CourseListItem {
    fn from(rated: CourseRating) -> Self {
        Self {
            id: rated.course.id,
            name: rated.course.name,
            teacher_id: rated.course.teacher_id,
            total_rating: rated.summary.count,
            average_rating: rated.summary.average,
        }
    }
}

#[derive(Serialize)]
pub struct TeacherName {
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
    pub teacher: TeacherName,
    pub total_rating: usize,
    pub average_rating: f64,
}

#[derive(Serialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub rank: u32,
    pub count: u32,
}

impl From<RankedEntry> for LeaderboardEntry {
    fn from(entry: RankedEntry) -> Self {
        Self {
            username: entry.identity,
            rank: entry.rank,
            count: entry.review_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListUser {
    pub id: i64,
    pub picture: Option<String>,
    pub username: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: i64,
    pub title: String,
    pub anonymous: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    /// `None` for anonymous posts.
    pub user: Option<PostListUser>,
}

impl From<PostWithAuthor> for PostListItem {
    fn from(row: PostWithAuthor) -> Self {
        let PostWithAuthor { post, author } = row;
        let user = (!post.anonymous).then(|| PostListUser {
            id: author.id,
            picture: author.picture,
            username: author.username,
        });

        Self {
            id: post.id,
            title: post.title,
            anonymous: post.anonymous,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailUser {
    pub id: i64,
    pub name: String,
    pub picture: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub anonymous: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub user: PostDetailUser,
}

pub const ANONYMOUS_NAME: &str = "Anonymous";

impl From<PostWithAuthor> for PostDetail {
    fn from(row: PostWithAuthor) -> Self {
        let PostWithAuthor { post, author } = row;
        let user = if post.anonymous {
            PostDetailUser {
                id: author.id,
                name: ANONYMOUS_NAME.to_string(),
                picture: String::new(),
            }
        } else {
            PostDetailUser {
                id: author.id,
                name: author.name,
                picture: author.picture.unwrap_or_default(),
            }
        };

        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            anonymous: post.anonymous,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line_id: Option<String>,
    pub ig_id: Option<String>,
}

impl From<UserSettings> for ContactInfo {
    fn from(settings: UserSettings) -> Self {
        Self {
            username: settings.username,
            email: settings.email,
            phone: settings.phone,
            line_id: settings.line_id,
            ig_id: settings.ig_id,
        }
    }
}
