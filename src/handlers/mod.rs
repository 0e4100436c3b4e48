use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    data_formats::PrayerResponse, db_helpers::get_comments_for_prayers_in_db,
    errors::RequestError, models::Prayer,
};

mod comment_handlers;
mod prayer_handlers;
mod user_handlers;

pub use comment_handlers::*;
pub use prayer_handlers::*;
pub use user_handlers::*;

type JsonResult<T> = Result<Json<T>, RequestError>;
type Pool = Arc<SqlitePool>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

/// Attaches comments to prayers, keeping the order of `prayers`.
async fn with_comments(
    pool: &SqlitePool,
    prayers: Vec<Prayer>,
    viewer: Option<Uuid>,
) -> Result<Vec<PrayerResponse>, RequestError> {
    let ids: Vec<Uuid> = prayers.iter().map(|prayer| prayer.id).collect();
    let mut comments = get_comments_for_prayers_in_db(pool, &ids).await?;
    Ok(prayers
        .into_iter()
        .map(|prayer| {
            let prayer_comments = comments.remove(&prayer.id).unwrap_or_default();
            PrayerResponse::new(prayer, prayer_comments, viewer)
        })
        .collect())
}

async fn single_with_comments(
    pool: &SqlitePool,
    prayer: Prayer,
    viewer: Option<Uuid>,
) -> Result<PrayerResponse, RequestError> {
    with_comments(pool, vec![prayer], viewer)
        .await?
        .pop()
        .ok_or(RequestError::ServerError)
}
