use serde::{Deserialize, Serialize};

use crate::errors::RequestError;

const MIN_TITLE_LENGTH: usize = 3;
const MIN_CONTENT_LENGTH: usize = 10;

// ----------------- Auth Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct SessionRequest {
    pub assertion: String,
}

// ----------------- User Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

// ----------------- Prayer Request -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrayerRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl CreatePrayerRequest {
    /// Trims the fields and checks their minimum lengths.
    pub fn validate(self) -> Result<Self, RequestError> {
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();

        if title.is_empty() {
            return Err(RequestError::RunTimeError("Title can't be empty"));
        }
        if content.is_empty() {
            return Err(RequestError::RunTimeError("Content can't be empty"));
        }
        if title.chars().count() < MIN_TITLE_LENGTH {
            return Err(RequestError::RunTimeError(
                "Title must be at least 3 characters long",
            ));
        }
        if content.chars().count() < MIN_CONTENT_LENGTH {
            return Err(RequestError::RunTimeError(
                "Content must be at least 10 characters long",
            ));
        }

        Ok(Self {
            title,
            content,
            is_anonymous: self.is_anonymous,
        })
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerPrayerRequest {
    pub status_message: Option<String>,
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(self) -> Result<Self, RequestError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(RequestError::RunTimeError("Comment can't be empty"));
        }
        Ok(Self {
            content: content.to_string(),
        })
    }
}
