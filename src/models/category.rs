use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A knowledge-base category as returned by `GET /api/category/getAll`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Knowledge-base text the chatbot answers from
    #[serde(default)]
    pub content: Option<String>,
    /// Preset questions shown in the chat UI
    #[serde(default)]
    pub presets: Vec<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}
