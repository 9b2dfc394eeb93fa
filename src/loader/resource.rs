//! Resource slot names and notification payloads.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Category, Chat, DashboardStats, Message, Session, User};

/// Errors surfaced by the resource loader.
///
/// Fetch failures never appear here; they are absorbed into empty
/// fallbacks at the load boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoaderError {
    /// A caller named a resource that does not exist. This is a
    /// programming mistake, not a transient condition.
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
}

/// The named resource slots held by [`super::AdminResources`].
///
/// `Messages` is derived from `Chats` and is never fetched on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Categories,
    Chats,
    Messages,
    Sessions,
    Stats,
}

impl ResourceKind {
    /// All slots, in the order views enumerate them.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Users,
        ResourceKind::Categories,
        ResourceKind::Chats,
        ResourceKind::Messages,
        ResourceKind::Sessions,
        ResourceKind::Stats,
    ];

    /// The name views pass to `refresh` and `is_loading`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Categories => "categories",
            ResourceKind::Chats => "chats",
            ResourceKind::Messages => "messages",
            ResourceKind::Sessions => "sessions",
            ResourceKind::Stats => "stats",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(ResourceKind::Users),
            "categories" => Ok(ResourceKind::Categories),
            "chats" => Ok(ResourceKind::Chats),
            "messages" => Ok(ResourceKind::Messages),
            "sessions" => Ok(ResourceKind::Sessions),
            "stats" => Ok(ResourceKind::Stats),
            other => Err(LoaderError::UnknownResource(other.to_string())),
        }
    }
}

/// A complete slot value, used both for change notifications and for
/// optimistic updates via `update_resource`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    Users(Vec<User>),
    Categories(Vec<Category>),
    Chats(Vec<Chat>),
    Messages(Vec<Message>),
    Sessions(Vec<Session>),
    Stats(DashboardStats),
}

impl ResourceData {
    /// The slot this value belongs to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Users(_) => ResourceKind::Users,
            ResourceData::Categories(_) => ResourceKind::Categories,
            ResourceData::Chats(_) => ResourceKind::Chats,
            ResourceData::Messages(_) => ResourceKind::Messages,
            ResourceData::Sessions(_) => ResourceKind::Sessions,
            ResourceData::Stats(_) => ResourceKind::Stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "presets".parse::<ResourceKind>().unwrap_err();
        assert_eq!(err, LoaderError::UnknownResource("presets".to_string()));
        assert_eq!(err.to_string(), "unknown resource type: presets");
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Users".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_data_kind() {
        assert_eq!(ResourceData::Users(vec![]).kind(), ResourceKind::Users);
        assert_eq!(
            ResourceData::Stats(DashboardStats::default()).kind(),
            ResourceKind::Stats
        );
    }
}
