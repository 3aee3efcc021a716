//! Sessions and credentials.
//!
//! The session is an `HttpOnly` cookie holding the user id; a request is
//! authenticated when that id resolves to a user row. Passwords are stored
//! as bcrypt hashes and must pass the strength rules below before a user is
//! created.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use sqlx::SqlitePool;
use tracing::debug;

use crate::{database, error::AppError};

pub const SESSION_COOKIE: &str = "session";

const SPECIAL_CHARS: &str = "!@#~$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub fn session_cookie(user_id: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .build()
}

/// Resolves the session cookie to the logged-in user.
pub async fn logged_in_user(
    jar: &CookieJar,
    pool: &SqlitePool,
) -> Result<(i64, String), AppError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;
    let user_id: i64 = cookie
        .value()
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let username = database::find_username(pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    debug!("session resolved to user {username}");
    Ok((user_id, username))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Checks the password strength rules, reporting the first one that fails.
pub fn check_password_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for ch in password.chars() {
        if ch.is_uppercase() {
            has_upper = true;
        } else if ch.is_lowercase() {
            has_lower = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if SPECIAL_CHARS.contains(ch) {
            has_special = true;
        }
    }

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }
    if !has_lower {
        return Err("Password must contain at least one lowercase letter".to_string());
    }
    if !has_digit {
        return Err("Password must contain at least one digit".to_string());
    }
    if !has_special {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}
