use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An auth session as returned by `GET /api/session/getAll`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_session() {
        let json = r#"{
            "id": 10,
            "userId": 42,
            "expiresAt": "2026-08-25T12:00:00",
            "active": true
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.user_id, 42);
        assert!(session.active);
        assert!(session.access_token.is_none());
    }
}
