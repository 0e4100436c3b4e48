use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    errors::RequestError,
    models::{Intercessor, Prayer},
};

use super::{
    begin_write, ensure_user_exists,
    prayer_helpers::{fetch_prayer, fetch_visible_prayer},
};

const RECENT_INTERCESSORS: i64 = 10;

/// Records that `user_id` prayed for the request and bumps its counter.
///
/// Both writes share one transaction, a repeated reaction is rejected by the
/// `(prayer_id, user_id)` unique constraint and leaves the counter untouched.
pub async fn pray_for_prayer_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    prayer_id: Uuid,
) -> Result<Prayer, RequestError> {
    let mut tx = begin_write(pool).await?;
    ensure_user_exists(&mut tx, user_id).await?;
    fetch_visible_prayer(&mut tx, prayer_id, Some(user_id)).await?;

    sqlx::query(
        r#"
        INSERT INTO prayer_counts (prayer_id, user_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(prayer_id)
    .bind(user_id)
    .execute(&mut tx)
    .await
    .map_err(|e| {
        let e = RequestError::from(e);
        if e.is_unique_violation() {
            RequestError::RunTimeError("You have already prayed for this request")
        } else {
            e
        }
    })?;

    sqlx::query(r#"UPDATE prayers SET prayer_count = prayer_count + 1 WHERE id = $1"#)
        .bind(prayer_id)
        .execute(&mut tx)
        .await?;

    let prayer = fetch_prayer(&mut tx, prayer_id, Some(user_id))
        .await?
        .ok_or(RequestError::NotFound("Prayer not found"))?;
    tx.commit().await?;

    tracing::debug!(%prayer_id, %user_id, count = prayer.prayer_count, "prayer registered");
    Ok(prayer)
}

/// The most recent users who prayed for a request, newest first.
pub async fn list_intercessors_in_db(
    pool: &SqlitePool,
    prayer_id: Uuid,
) -> Result<Vec<Intercessor>, RequestError> {
    let mut tx = pool.begin().await?;
    fetch_visible_prayer(&mut tx, prayer_id, None).await?;

    let result = sqlx::query_as::<Sqlite, Intercessor>(
        r#"
        SELECT users.id                 AS "id",
               users.name               AS "name",
               users.image              AS "image",
               prayer_counts.created_at AS "prayed_at"
        FROM   prayer_counts
            JOIN users
                ON prayer_counts.user_id = users.id
        WHERE  prayer_counts.prayer_id = $1
        ORDER  BY prayer_counts.created_at DESC, prayer_counts.id DESC
        LIMIT  $2
        "#,
    )
    .bind(prayer_id)
    .bind(RECENT_INTERCESSORS)
    .fetch_all(&mut tx)
    .await?;

    tx.commit().await?;
    Ok(result)
}
