use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{errors::RequestError, models::User};

mod comment_helpers;
mod prayer_helpers;
mod reaction_helpers;
mod user_helpers;

pub use comment_helpers::*;
pub use prayer_helpers::*;
pub use reaction_helpers::*;
pub use user_helpers::*;

pub(crate) const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: Option<&'static str>,
    counter: usize,
}

impl QueryBuilder {
    fn new(
        initial: String,
        seperator: Option<&'static str>,
        inital_params: Option<Vec<String>>,
    ) -> Self {
        Self {
            query: initial,
            params: inital_params.unwrap_or_default(),
            seperator,
            counter: 0,
        }
    }

    fn add_param(mut self, filter: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            let filter = format!("{} = ${}", filter, self.params.len() + 1);
            self.query.push_str(&filter);
            if let Some(seperator) = self.seperator {
                self.query.push_str(seperator);
            }
            self.params.push(value);
            self.counter += 1;
        }
        self
    }

    fn trim(mut self) -> Self {
        if let Some(seperator) = self.seperator {
            self.query = self.query.trim_end_matches(seperator).to_string();
        }
        self
    }

    /// Returns an empty query when no parameter was added.
    pub fn build(mut self) -> (String, Vec<String>) {
        self = self.trim();
        self.query = if !self.params.is_empty() && self.counter > 0 {
            self.query
        } else {
            String::new()
        };
        (self.query, self.params)
    }
}

/// `$start, $start+1, ...` for an `IN (...)` list of `count` values.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn parse_id(id: &str, missing: &'static str) -> Result<Uuid, RequestError> {
    Uuid::parse_str(id).map_err(|_| RequestError::NotFound(missing))
}

// ----------------- Helper Functions -----------------

/// Opens a transaction that holds the database write lock from its first statement.
///
/// A deferred SQLite transaction that reads before it writes cannot upgrade
/// once another writer has committed in between (`SQLITE_BUSY`). Taking the
/// lock up front makes concurrent writers queue on `busy_timeout` instead.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(r#"UPDATE users SET id = id WHERE 0"#)
        .execute(&mut tx)
        .await?;
    Ok(tx)
}

const USER_QUERY: &str = r#"
        SELECT id, name, email, image, created_at, updated_at FROM users WHERE id = $1
        "#;

pub(crate) async fn fetch_user(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<Sqlite, User>(USER_QUERY)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    Ok(result)
}

/// Tokens outlive account deletion; writes re-check that their author still exists.
pub(crate) async fn ensure_user_exists(
    tx: &mut Transaction<'_, Sqlite>,
    id: Uuid,
) -> Result<(), RequestError> {
    match fetch_user(tx, id).await? {
        Some(_) => Ok(()),
        None => Err(RequestError::NotAuthorized("User no longer exists")),
    }
}

pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = fetch_user(&mut tx, id).await?;
    tx.commit().await?;
    Ok(result)
}
