use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::data_formats::{CreatePrayerRequest, FeedQueryParams};
use crate::errors::RequestError;
use crate::models::{Prayer, PrayerStatus};

use super::{begin_write, ensure_user_exists, NOW};

// $1 is the viewer, used for `has_prayed`.
const PRAYER_QUERY: &str = r#"
            SELECT prayers.id                                   AS "id",
                   prayers.title                                AS "title",
                   prayers.content                              AS "content",
                   prayers.author_id                            AS "author_id",
                   prayers.is_anonymous                         AS "is_anonymous",
                   prayers.is_hidden                            AS "is_hidden",
                   prayers.prayer_count                         AS "prayer_count",
                   prayers.status                               AS "status",
                   prayers.status_message                       AS "status_message",
                   prayers.created_at                           AS "created_at",
                   prayers.updated_at                           AS "updated_at",
                   users.name                                   AS "author_name",
                   users.image                                  AS "author_image",
                   EXISTS (SELECT 1
                           FROM   prayer_counts
                           WHERE  prayer_counts.prayer_id = prayers.id
                              AND prayer_counts.user_id = $1)   AS "has_prayed"
            FROM   prayers
                JOIN users
                    ON prayers.author_id = users.id
"#;

const NEWEST_FIRST: &str = "ORDER BY prayers.created_at DESC, prayers.rowid DESC";

pub(crate) async fn fetch_prayer(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<Prayer>, RequestError> {
    let query = format!("{PRAYER_QUERY} WHERE prayers.id = $2");
    let result = sqlx::query_as::<Sqlite, Prayer>(&query)
        .bind(viewer)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    Ok(result)
}

/// Loads a prayer the caller may act on: missing and hidden prayers are both not found.
pub(crate) async fn fetch_visible_prayer(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Prayer, RequestError> {
    match fetch_prayer(tx, id, viewer).await? {
        Some(prayer) if !prayer.is_hidden => Ok(prayer),
        _ => Err(RequestError::NotFound("Prayer not found")),
    }
}

/// Fetches a prayer owned by `user_id`.
async fn fetch_owned_prayer(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
    user_id: Uuid,
) -> Result<Prayer, RequestError> {
    let prayer = match fetch_prayer(tx, id, Some(user_id)).await? {
        Some(prayer) if prayer.is_visible_to(Some(user_id)) => prayer,
        _ => return Err(RequestError::NotFound("Prayer not found")),
    };
    if prayer.author_id != user_id {
        return Err(RequestError::Forbidden);
    }
    Ok(prayer)
}

pub async fn list_prayers_in_db(
    pool: &SqlitePool,
    viewer: Option<Uuid>,
    params: FeedQueryParams,
) -> Result<(Vec<Prayer>, i64), RequestError> {
    let mut tx = pool.begin().await?;

    let query = format!("{PRAYER_QUERY} WHERE prayers.is_hidden = 0 {NEWEST_FIRST} LIMIT $2 OFFSET $3");
    let prayers = sqlx::query_as::<Sqlite, Prayer>(&query)
        .bind(viewer)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&mut tx)
        .await?;

    let total = sqlx::query_scalar::<Sqlite, i64>(
        r#"SELECT COUNT(*) FROM prayers WHERE is_hidden = 0"#,
    )
    .fetch_one(&mut tx)
    .await?;

    tx.commit().await?;
    Ok((prayers, total))
}

pub async fn list_prayers_by_author_in_db(
    pool: &SqlitePool,
    author_id: Uuid,
) -> Result<Vec<Prayer>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{PRAYER_QUERY} WHERE prayers.author_id = $1 AND prayers.is_hidden = 0 {NEWEST_FIRST}"
    );
    let prayers = sqlx::query_as::<Sqlite, Prayer>(&query)
        .bind(author_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(prayers)
}

pub async fn get_prayer_by_id_in_db(
    pool: &SqlitePool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<Prayer>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = fetch_prayer(&mut tx, id, viewer).await?;
    tx.commit().await?;
    Ok(result.filter(|prayer| prayer.is_visible_to(viewer)))
}

pub async fn create_prayer_in_db(
    pool: &SqlitePool,
    author_id: Uuid,
    CreatePrayerRequest {
        title,
        content,
        is_anonymous,
    }: CreatePrayerRequest,
) -> Result<Prayer, RequestError> {
    let mut tx = begin_write(pool).await?;
    ensure_user_exists(&mut tx, author_id).await?;
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO prayers (id, title, content, author_id, is_anonymous)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(author_id)
    .bind(is_anonymous)
    .execute(&mut tx)
    .await?;

    let prayer = fetch_prayer(&mut tx, id, Some(author_id))
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(prayer)
}

pub async fn hide_prayer_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    fetch_owned_prayer(&mut tx, id, user_id).await?;

    let query = format!("UPDATE prayers SET is_hidden = 1, updated_at = {NOW} WHERE id = $1");
    sqlx::query(&query).bind(id).execute(&mut tx).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn answer_prayer_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
    status_message: Option<String>,
) -> Result<Prayer, RequestError> {
    let mut tx = begin_write(pool).await?;
    fetch_owned_prayer(&mut tx, id, user_id).await?;

    let status_message = status_message
        .map(|message| message.trim().to_string())
        .unwrap_or_default();
    let query = format!(
        "UPDATE prayers SET status = $1, status_message = $2, updated_at = {NOW} WHERE id = $3"
    );
    sqlx::query(&query)
        .bind(PrayerStatus::Answered)
        .bind(status_message)
        .bind(id)
        .execute(&mut tx)
        .await?;

    let prayer = fetch_prayer(&mut tx, id, Some(user_id))
        .await?
        .ok_or(RequestError::NotFound("Prayer not found"))?;
    tx.commit().await?;
    Ok(prayer)
}
