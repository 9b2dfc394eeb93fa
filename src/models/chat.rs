use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question/answer exchange inside a chat.
///
/// `like` is tri-state feedback: `Some(true)` liked, `Some(false)`
/// disliked, `None` no feedback given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub bot_message: Option<String>,
    #[serde(default)]
    pub like: Option<bool>,
    /// Name of the category the question was resolved against
    #[serde(default)]
    pub category: Option<String>,
}

/// A chat conversation as returned by `GET /api/chat/getAll`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    pub user_id: i64,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
}
