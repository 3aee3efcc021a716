//! # Task-list server
//!
//! Small task-list web application: cookie sessions, bcrypt-hashed
//! credentials, SQLite storage, server-rendered pages.
//!
//! ## Routes
//!
//! - `/`, `/home`: landing page, logged-in users go to `/tasks`
//! - `/login`, `/register`: pages on GET, JSON form endpoints on POST
//! - `/logout`: expires the session
//! - `/tasks`: the task list, session required
//! - `/add`, `/edit`, `/delete`: task mutations, session required
//!
//! The login and register POST endpoints answer field-level validation
//! failures as `{field, message}` JSON so the forms can show inline errors;
//! everything else redirects.
//!
//! ## Running
//!
//! ```sh
//! RUST_LOG=info cargo run -p tasklist
//! ```
//!
//! Configuration comes from `TASKS_PORT` and `TASKS_DATABASE_URL`, with
//! logged defaults.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;

use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(routes::home_page))
        .route("/home", get(routes::home_page))
        .route("/login", get(routes::login_page).post(routes::login))
        .route("/register", get(routes::register_page).post(routes::register))
        .route("/logout", get(routes::logout))
        .route("/tasks", get(routes::tasks_page))
        .route("/add", post(routes::add_task))
        .route("/edit", post(routes::edit_task))
        .route("/delete", get(routes::delete_task))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
