mod authentication;
pub mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
pub mod seed;

use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use config::Config;
pub use data_formats::*;
pub use errors::{RequestErrorJson, RequestErrorJsonWrapper};
use handlers::*;
pub use models::PrayerStatus;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use tower_http::trace::TraceLayer;

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// How long a writer waits for the SQLite write lock before failing.
const DB_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run_app(app: Router, config: Config) -> Result<()> {
    let db = init_db(&config.database_url).await?;
    let address = config.socket_addr();
    let app = app
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(config)))
        .layer(TraceLayer::new_for_http());
    tracing::info!("Server started on {}", address);
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    } else {
        tracing::debug!("Database already exists");
    }
    let options = SqliteConnectOptions::from_str(db_url)
        .context("Invalid DATABASE_URL")?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(DB_BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    tracing::info!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations completed");
    Ok(pool)
}

pub fn get_random_free_port() -> (u16, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Could not bind to a free port");
    match listener.local_addr() {
        Ok(addr) => (addr.port(), addr),
        Err(_) => panic!("Could not get a free port"),
    }
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/auth/session", post(create_session))
        .route(
            "/user",
            get(get_current_user).put(update_user).delete(delete_user),
        )
        .route("/user/prayers", get(list_user_prayers))
        .route("/prayers", get(list_prayers).post(create_prayer))
        .route("/prayers/:id", get(get_prayer))
        .route("/prayers/:id/pray", post(pray_for_prayer))
        .route("/prayers/:id/prayed-by", get(list_intercessors))
        .route("/prayers/:id/hide", post(hide_prayer))
        .route("/prayers/:id/answer", post(answer_prayer))
        .route(
            "/prayers/:id/comments",
            get(list_comments).post(add_comment),
        )
        .route("/comments/:id", put(edit_comment).delete(delete_comment))
        .fallback(not_found)
}
