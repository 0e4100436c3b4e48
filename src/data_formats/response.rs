use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Comment, Intercessor, Prayer, PrayerStatus, User};

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    format!("{}Z", timestamp.format("%Y-%m-%dT%H:%M:%S%.3f"))
}

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub prayer_id: Uuid,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub author: AuthorResponse,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PrayerResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub is_hidden: bool,
    pub prayer_count: i64,
    pub has_prayed: bool,
    pub status: PrayerStatus,
    pub status_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Absent for anonymous prayers unless the caller wrote it.
    pub author: Option<AuthorResponse>,
    pub comments: Vec<CommentResponse>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IntercessorResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub prayed_at: String,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            name,
            email,
            image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            id,
            name,
            email,
            image,
            token,
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            prayer_id,
            content,
            created_at,
            updated_at,
            author_id,
            author_name,
            author_image,
            ..
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            prayer_id,
            content,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            author: AuthorResponse {
                id: author_id,
                name: author_name,
                image: author_image,
            },
        }
    }
}

impl PrayerResponse {
    pub fn new(
        Prayer {
            id,
            title,
            content,
            author_id,
            is_anonymous,
            is_hidden,
            prayer_count,
            status,
            status_message,
            created_at,
            updated_at,
            author_name,
            author_image,
            has_prayed,
            ..
        }: Prayer,
        comments: Vec<Comment>,
        viewer: Option<Uuid>,
    ) -> Self {
        let author = if is_anonymous && viewer != Some(author_id) {
            None
        } else {
            Some(AuthorResponse {
                id: author_id,
                name: author_name,
                image: author_image,
            })
        };
        PrayerResponse {
            id,
            title,
            content,
            is_anonymous,
            is_hidden,
            prayer_count,
            has_prayed,
            status,
            status_message,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            author,
            comments: comments.into_iter().map(CommentResponse::new).collect(),
        }
    }
}

impl From<Intercessor> for IntercessorResponse {
    fn from(
        Intercessor {
            id,
            name,
            image,
            prayed_at,
        }: Intercessor,
    ) -> Self {
        IntercessorResponse {
            id,
            name,
            image,
            prayed_at: format_timestamp(prayed_at),
        }
    }
}
