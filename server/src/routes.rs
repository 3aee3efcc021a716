//! Request handlers.
//!
//! The login and register POST endpoints speak the `{field, message}` JSON
//! contract so the forms can render inline errors next to the failing input.
//! Task mutations redirect back to `/tasks`; unauthenticated page loads
//! redirect to `/login`.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{auth, database, error::AppError, pages, state::AppState};

/// Wire shape of a field-level validation failure. An empty `field` marks an
/// error not attributable to a single input.
#[derive(Serialize)]
struct FieldError {
    field: &'static str,
    message: String,
}

fn field_error(status: StatusCode, field: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(FieldError {
            field,
            message: message.into(),
        }),
    )
        .into_response()
}

pub async fn home_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if auth::logged_in_user(&jar, &state.pool).await.is_ok() {
        return Redirect::to("/tasks").into_response();
    }

    pages::render(pages::HomeTemplate)
}

pub async fn login_page() -> Response {
    pages::render(pages::LoginTemplate)
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some((user_id, password_hash)) = database::find_user(&state.pool, &form.username).await?
    else {
        return Ok(field_error(
            StatusCode::BAD_REQUEST,
            "username",
            "User does not exist",
        ));
    };

    if !auth::verify_password(&form.password, &password_hash) {
        return Ok(field_error(
            StatusCode::BAD_REQUEST,
            "password",
            "Incorrect password",
        ));
    }

    let jar = jar.add(auth::session_cookie(user_id));
    info!("user {} logged in", form.username);

    Ok((jar, Json(json!({ "redirect": "/tasks" }))).into_response())
}

pub async fn register_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if auth::logged_in_user(&jar, &state.pool).await.is_ok() {
        return Redirect::to("/tasks").into_response();
    }

    pages::render(pages::RegisterTemplate)
}

#[derive(Deserialize)]
pub struct RegisterForm {
    username: String,
    password: String,
    #[serde(rename = "confirmPassword")]
    confirm_password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if database::username_taken(&state.pool, &form.username).await? {
        return Ok(field_error(
            StatusCode::CONFLICT,
            "username",
            "Username already taken",
        ));
    }

    if let Err(reason) = auth::check_password_strength(&form.password) {
        return Ok(field_error(StatusCode::BAD_REQUEST, "password", reason));
    }

    if form.password != form.confirm_password {
        return Ok(field_error(
            StatusCode::BAD_REQUEST,
            "confirmPassword",
            "Passwords do not match",
        ));
    }

    let password_hash = auth::hash_password(&form.password)?;
    database::insert_user(&state.pool, &form.username, &password_hash).await?;
    info!("registered user {}", form.username);

    Ok(Json(json!({ "message": "User registered successfully" })).into_response())
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(auth::SESSION_COOKIE).path("/"));

    (jar, Redirect::to("/home")).into_response()
}

pub async fn tasks_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Ok((user_id, username)) = auth::logged_in_user(&jar, &state.pool).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let todos = database::list_todos(&state.pool, user_id).await?;
    info!("found {} todos for user {username}", todos.len());

    Ok(pages::render(pages::TasksTemplate { username, todos }))
}

#[derive(Deserialize)]
pub struct AddForm {
    title: String,
}

pub async fn add_task(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AddForm>,
) -> Result<Redirect, AppError> {
    let (user_id, _) = auth::logged_in_user(&jar, &state.pool).await?;

    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("Task title cannot be empty".to_string()));
    }

    database::insert_todo(&state.pool, user_id, form.title.trim()).await?;

    Ok(Redirect::to("/tasks"))
}

#[derive(Deserialize)]
pub struct EditForm {
    id: i64,
    title: String,
    #[serde(default)]
    status: Option<String>,
}

pub async fn edit_task(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let (user_id, _) = auth::logged_in_user(&jar, &state.pool).await?;

    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".to_string()));
    }

    // Checkbox field: present means completed, absent means pending.
    let status = if form.status.as_deref() == Some("Completed") {
        "Completed"
    } else {
        "Pending"
    };

    let owner = database::todo_owner(&state.pool, form.id)
        .await?
        .ok_or(AppError::TaskNotFound)?;
    if owner != user_id {
        return Err(AppError::Unauthorized);
    }

    database::update_todo(&state.pool, form.id, user_id, &form.title, status).await?;

    Ok(Redirect::to("/tasks"))
}

#[derive(Deserialize)]
pub struct DeleteParams {
    id: i64,
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<DeleteParams>,
) -> Result<Redirect, AppError> {
    let (user_id, _) = auth::logged_in_user(&jar, &state.pool).await?;

    let deleted = database::delete_todo(&state.pool, params.id, user_id).await?;
    if deleted == 0 {
        return Err(AppError::NotOwner);
    }

    Ok(Redirect::to("/tasks"))
}
