//! Data models for the CIC backend API.
//!
//! All wire types use camelCase field names to match the backend's JSON.
//! Timestamps are `NaiveDateTime` because the backend serializes
//! `LocalDateTime` without a timezone.

mod category;
mod chat;
mod session;
mod stats;
mod user;

pub use category::Category;
pub use chat::{Chat, Message};
pub use session::Session;
pub use stats::{CategoryFeedback, DashboardStats};
pub use user::User;
