use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered user as returned by `GET /api/user/getAll`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// Role name as the backend reports it (e.g. "ADMIN", "STUDENT")
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
    #[serde(default)]
    pub last_logout: Option<NaiveDateTime>,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub banned: bool,
}
