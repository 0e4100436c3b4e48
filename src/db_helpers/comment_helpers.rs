use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{data_formats::CommentRequest, errors::RequestError, models::Comment};

use super::{
    begin_write, ensure_user_exists, placeholders,
    prayer_helpers::{fetch_prayer, fetch_visible_prayer},
    NOW,
};

const COMMENT_QUERY: &str = r#"
        SELECT comments.id         AS "id",
               comments.content    AS "content",
               comments.author_id  AS "author_id",
               comments.prayer_id  AS "prayer_id",
               prayers.author_id   AS "prayer_author_id",
               prayers.is_hidden   AS "prayer_is_hidden",
               comments.created_at AS "created_at",
               comments.updated_at AS "updated_at",
               users.name          AS "author_name",
               users.image         AS "author_image"
        FROM   comments
            JOIN users
                ON comments.author_id = users.id
            JOIN prayers
                ON comments.prayer_id = prayers.id
"#;

const OLDEST_FIRST: &str = "ORDER BY comments.created_at ASC, comments.rowid ASC";

async fn fetch_comment(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<Option<Comment>, RequestError> {
    let query = format!("{COMMENT_QUERY} WHERE comments.id = $1");
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    Ok(result)
}

/// Loads a comment and checks that `user_id` may change it.
///
/// Comments of a hidden prayer only exist for the prayer's author.
async fn fetch_modifiable_comment(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    id: Uuid,
) -> Result<Comment, RequestError> {
    let comment = match fetch_comment(tx, id).await? {
        Some(comment) if comment.is_visible_to(Some(user_id)) => comment,
        _ => return Err(RequestError::NotFound("Comment not found")),
    };
    if !comment.can_be_modified_by(user_id) {
        tracing::debug!(comment_id = %id, %user_id, "comment change refused");
        return Err(RequestError::Forbidden);
    }
    Ok(comment)
}

pub async fn add_comment_to_prayer_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    prayer_id: Uuid,
    CommentRequest { content }: CommentRequest,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;
    ensure_user_exists(&mut tx, user_id).await?;
    fetch_visible_prayer(&mut tx, prayer_id, Some(user_id)).await?;

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO comments (id, content, author_id, prayer_id)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(user_id)
    .bind(prayer_id)
    .execute(&mut tx)
    .await?;

    let comment = fetch_comment(&mut tx, id)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn update_comment_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
    CommentRequest { content }: CommentRequest,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;
    fetch_modifiable_comment(&mut tx, user_id, id).await?;

    let query = format!("UPDATE comments SET content = $1, updated_at = {NOW} WHERE id = $2");
    sqlx::query(&query)
        .bind(content)
        .bind(id)
        .execute(&mut tx)
        .await?;

    let comment = fetch_comment(&mut tx, id)
        .await?
        .ok_or(RequestError::NotFound("Comment not found"))?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;
    fetch_modifiable_comment(&mut tx, user_id, id).await?;

    sqlx::query(r#"DELETE FROM comments WHERE id = $1"#)
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Comments of one prayer, oldest first, for a viewer who can see the prayer.
pub async fn get_comments_for_prayer_in_db(
    pool: &SqlitePool,
    prayer_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Vec<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    match fetch_prayer(&mut tx, prayer_id, viewer).await? {
        Some(prayer) if prayer.is_visible_to(viewer) => {}
        _ => return Err(RequestError::NotFound("Prayer not found")),
    }

    let query = format!("{COMMENT_QUERY} WHERE comments.prayer_id = $1 {OLDEST_FIRST}");
    let result = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(prayer_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result)
}

/// Comments of several prayers at once, grouped by prayer, oldest first.
pub async fn get_comments_for_prayers_in_db(
    pool: &SqlitePool,
    prayer_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Comment>>, RequestError> {
    let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    if prayer_ids.is_empty() {
        return Ok(grouped);
    }

    let mut tx = pool.begin().await?;
    let query = format!(
        "{COMMENT_QUERY} WHERE comments.prayer_id IN ({}) {OLDEST_FIRST}",
        placeholders(1, prayer_ids.len())
    );
    let mut comments = sqlx::query_as::<Sqlite, Comment>(&query);
    for id in prayer_ids {
        comments = comments.bind(*id);
    }
    let comments = comments.fetch_all(&mut tx).await?;
    tx.commit().await?;

    for comment in comments {
        grouped.entry(comment.prayer_id).or_default().push(comment);
    }
    Ok(grouped)
}
