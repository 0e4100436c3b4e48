use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PrayerStatus {
    Active,
    Answered,
}

/// A prayer joined with its author and the caller's reaction state.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Prayer {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub is_anonymous: bool,
    pub is_hidden: bool,
    pub prayer_count: i64,
    pub status: PrayerStatus,
    pub status_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author_name: String,
    pub author_image: Option<String>,
    pub has_prayed: bool,
}

impl Prayer {
    pub fn is_visible_to(&self, user_id: Option<Uuid>) -> bool {
        !self.is_hidden || user_id == Some(self.author_id)
    }
}

/// A comment joined with its author and the author of the prayer it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub prayer_id: Uuid,
    pub prayer_author_id: Uuid,
    pub prayer_is_hidden: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub author_name: String,
    pub author_image: Option<String>,
}

impl Comment {
    /// Comments share the visibility of their prayer.
    pub fn is_visible_to(&self, user_id: Option<Uuid>) -> bool {
        !self.prayer_is_hidden || user_id == Some(self.prayer_author_id)
    }

    /// Comment authors and the author of the parent prayer may edit or delete a comment.
    pub fn can_be_modified_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id || self.prayer_author_id == user_id
    }
}

/// A user who prayed for a request.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Intercessor {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub prayed_at: NaiveDateTime,
}
