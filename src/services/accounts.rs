use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, Utc};
use log::info;
use rand::Rng;

use crate::database::{self, DbConn, NewUser, Role, User};

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    pub token: String,
    pub expires_at: NaiveDateTime,
}

/// Finds or registers the user behind an identity-provider profile and mints
/// a bearer token for them.
pub fn issue_session(
    conn: &mut DbConn,
    profile: &NewUser,
    role: Option<Role>,
    ttl_days: i64,
) -> Result<IssuedSession> {
    let mut user = find_or_register(conn, profile)?;

    if let Some(role) = role.filter(|r| *r != user.role) {
        database::users::set_role(conn, user.id, role)?;
        info!("Changed role of {} to {}", user.email, role.as_str());
        user.role = role;
    }

    let now = Utc::now().naive_utc();
    let removed = database::sessions::delete_expired(conn, now)?;
    if removed > 0 {
        info!("Removed {} expired sessions", removed);
    }

    let token = generate_token();
    let expires_at = now + Duration::days(ttl_days);
    database::sessions::insert_session(conn, &token, user.id, expires_at)?;

    Ok(IssuedSession {
        user,
        token,
        expires_at,
    })
}

fn find_or_register(conn: &mut DbConn, profile: &NewUser) -> Result<User> {
    if let Some(existing) = database::users::find_by_email(conn, &profile.email)? {
        info!("User {} already registered", existing.email);
        return Ok(existing);
    }

    let student_id = student_id_from_email(&profile.email)
        .with_context(|| format!("Cannot derive a student id from {:?}", profile.email))?;

    let user = database::users::insert_user(conn, &student_id, profile, Role::User)?;
    database::users::insert_settings(conn, user.id, &user.email)?;
    info!("Registered user {} ({})", user.email, user.student_id);

    Ok(user)
}

/// School addresses are `<student id>@<domain>`.
pub fn student_id_from_email(email: &str) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(local.to_uppercase())
}

fn generate_token() -> String {
    let mut rng = rand::rng();
    format!("{:032x}{:032x}", rng.random::<u128>(), rng.random::<u128>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup};

    fn profile(email: &str) -> NewUser {
        NewUser {
            name: "Chen Yu".to_string(),
            given_name: Some("Yu".to_string()),
            family_name: Some("Chen".to_string()),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_student_id_from_email() {
        assert_eq!(student_id_from_email("d11019139@mail.school.edu"), Some("D11019139".to_string()));
        assert_eq!(student_id_from_email("no-at-sign"), None);
        assert_eq!(student_id_from_email("@school.edu"), None);
    }

    #[test]
    fn test_first_session_registers_user_with_settings() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::ensure_schema(&mut conn).unwrap();

        let issued = issue_session(&mut conn, &profile("d1234@school.edu"), None, 7).unwrap();

        assert_eq!(issued.user.student_id, "D1234");
        assert_eq!(issued.user.role, Role::User);
        assert_eq!(issued.token.len(), 64);
        let settings = database::users::find_settings(&mut conn, issued.user.id).unwrap().unwrap();
        assert_eq!(settings.email.as_deref(), Some("d1234@school.edu"));
    }

    #[test]
    fn test_returning_user_is_reused_and_role_updated() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        setup::ensure_schema(&mut conn).unwrap();

        let first = issue_session(&mut conn, &profile("d1@school.edu"), None, 7).unwrap();
        let second = issue_session(&mut conn, &profile("d1@school.edu"), Some(Role::Admin), 7).unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_ne!(first.token, second.token);
        assert_eq!(second.user.role, Role::Admin);

        let now = Utc::now().naive_utc();
        let session = database::sessions::find_active(&mut conn, &first.token, now).unwrap().unwrap();
        assert_eq!(session.role, Role::Admin);
    }
}
