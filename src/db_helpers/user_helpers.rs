use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{data_formats::UpdateUserRequest, errors::RequestError, models::User};

use super::{begin_write, fetch_user, QueryBuilder, NOW};

/// Profile data taken from a verified identity-provider sign-in.
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub provider: String,
    pub provider_account_id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
}

/// Mirrors an identity-provider profile into `users` and links the provider account.
///
/// The user is resolved through the linked account first, then by email; a new
/// id is generated for first sign-ins.
pub async fn sync_identity_in_db(
    pool: &SqlitePool,
    profile: &IdentityProfile,
) -> Result<User, RequestError> {
    let mut tx = begin_write(pool).await?;

    let linked = sqlx::query_scalar::<Sqlite, Uuid>(
        r#"
        SELECT user_id FROM accounts WHERE provider = $1 AND provider_account_id = $2
        "#,
    )
    .bind(&profile.provider)
    .bind(&profile.provider_account_id)
    .fetch_optional(&mut tx)
    .await?;

    let existing = match linked {
        Some(id) => Some(id),
        None => {
            sqlx::query_scalar::<Sqlite, Uuid>(r#"SELECT id FROM users WHERE email = $1"#)
                .bind(&profile.email)
                .fetch_optional(&mut tx)
                .await?
        }
    };
    let id = existing.unwrap_or_else(Uuid::new_v4);

    let upsert = format!(
        r#"
        INSERT INTO users (id, name, email, image)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            image = COALESCE(excluded.image, users.image),
            updated_at = {NOW}
        "#
    );
    sqlx::query(&upsert)
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.image)
        .execute(&mut tx)
        .await
        .map_err(|e| {
            let e = RequestError::from(e);
            if e.is_unique_violation() {
                RequestError::RunTimeError("Email already belongs to another account")
            } else {
                e
            }
        })?;

    sqlx::query(
        r#"
        INSERT INTO accounts (provider, provider_account_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (provider, provider_account_id) DO NOTHING
        "#,
    )
    .bind(&profile.provider)
    .bind(&profile.provider_account_id)
    .bind(id)
    .execute(&mut tx)
    .await?;

    let user = fetch_user(&mut tx, id)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;

    tracing::debug!(user_id = %user.id, provider = %profile.provider, "synced identity");
    Ok(user)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: Uuid,
    UpdateUserRequest { name, image }: UpdateUserRequest,
) -> Result<User, RequestError> {
    let name = name.map(|name| name.trim().to_string());
    if matches!(&name, Some(name) if name.is_empty()) {
        return Err(RequestError::RunTimeError("Name can't be empty"));
    }

    let mut tx = begin_write(pool).await?;

    let (query, params) = QueryBuilder::new("UPDATE users SET ".to_owned(), Some(", "), None)
        .add_param("name", name)
        .add_param("image", image)
        .build();

    if !query.is_empty() {
        let query = format!(
            "{query}, updated_at = {NOW} WHERE id = ${}",
            params.len() + 1
        );
        let mut update = sqlx::query(&query);
        for param in params {
            update = update.bind(param);
        }
        update.bind(id).execute(&mut tx).await?;
    }

    let user = fetch_user(&mut tx, id)
        .await?
        .ok_or(RequestError::NotAuthorized("User no longer exists"))?;
    tx.commit().await?;
    Ok(user)
}

/// Removes the user and everything they own in one transaction.
///
/// Counters of prayers the user reacted to are decremented so that
/// `prayer_count` keeps matching the reaction rows.
pub async fn delete_user_in_db(pool: &SqlitePool, id: Uuid) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;

    if fetch_user(&mut tx, id).await?.is_none() {
        return Err(RequestError::NotAuthorized("User no longer exists"));
    }

    let statements = [
        r#"
        UPDATE prayers SET prayer_count = prayer_count - 1
        WHERE id IN (SELECT prayer_id FROM prayer_counts WHERE user_id = $1)
            AND author_id != $1
        "#,
        r#"DELETE FROM comments WHERE author_id = $1"#,
        r#"DELETE FROM prayer_counts WHERE user_id = $1"#,
        r#"
        DELETE FROM comments
        WHERE prayer_id IN (SELECT id FROM prayers WHERE author_id = $1)
        "#,
        r#"
        DELETE FROM prayer_counts
        WHERE prayer_id IN (SELECT id FROM prayers WHERE author_id = $1)
        "#,
        r#"DELETE FROM prayers WHERE author_id = $1"#,
        r#"DELETE FROM accounts WHERE user_id = $1"#,
        r#"DELETE FROM users WHERE id = $1"#,
    ];
    for statement in statements {
        sqlx::query(statement).bind(id).execute(&mut tx).await?;
    }

    tx.commit().await?;
    tracing::info!(user_id = %id, "deleted account");
    Ok(())
}
