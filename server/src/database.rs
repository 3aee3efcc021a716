//! # SQLite
//!
//! Storage for users and todos.
//!
//! Two tables: `users` (unique username, bcrypt password hash) and `todos`
//! (owner, title, `Pending`/`Completed` status). Both are created on startup
//! if missing. Every todo mutation is scoped to the owning user in the WHERE
//! clause, so a forged id cannot touch another user's rows.

use sqlx::{FromRow, SqlitePool, sqlite::SqlitePoolOptions};

const CREATE_USERS: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE,
        password TEXT
    );";

const CREATE_TODOS: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        title TEXT,
        status TEXT NOT NULL DEFAULT 'Pending',
        FOREIGN KEY (user_id) REFERENCES users(id)
    );";

#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub status: String,
}

pub async fn init_db(database_url: &str) -> SqlitePool {
    // One connection: SQLite serializes writers anyway, and it keeps
    // `sqlite::memory:` databases from vanishing between pool checkouts.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .unwrap();

    sqlx::query(CREATE_USERS).execute(&pool).await.unwrap();
    sqlx::query(CREATE_TODOS).execute(&pool).await.unwrap();

    pool
}

pub async fn find_user(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    sqlx::query_as("SELECT id, password FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_username(pool: &SqlitePool, user_id: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT username FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn username_taken(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn list_todos(pool: &SqlitePool, user_id: i64) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as("SELECT id, title, status FROM todos WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn insert_todo(pool: &SqlitePool, user_id: i64, title: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO todos (user_id, title, status) VALUES (?, ?, 'Pending')")
        .bind(user_id)
        .bind(title)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn todo_owner(pool: &SqlitePool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM todos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Updates a todo, scoped to its owner. Returns the number of rows touched.
pub async fn update_todo(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    title: &str,
    status: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE todos SET title = ?, status = ? WHERE id = ? AND user_id = ?")
        .bind(title)
        .bind(status)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes a todo, scoped to its owner. Returns the number of rows touched.
pub async fn delete_todo(pool: &SqlitePool, id: i64, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
