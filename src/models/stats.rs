use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Like/dislike breakdown for one category.
///
/// `total` counts only messages that carry feedback, so it can be less
/// than `total_messages`. Ratios are whole percentages, zero when no
/// feedback exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFeedback {
    pub likes: usize,
    pub dislikes: usize,
    pub total: usize,
    pub like_ratio: u32,
    pub dislike_ratio: u32,
    pub total_messages: usize,
}

/// Aggregate dashboard statistics derived from the loaded resources.
///
/// Never fetched from the backend; always recomputed from the current
/// users/categories/chats/sessions snapshot. The `Default` value stands
/// in for "stats unavailable".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Count of non-banned users
    pub total_users: usize,
    /// Sessions currently marked active
    pub active_users: usize,
    /// Sessions marked inactive
    pub inactive_users: usize,
    pub banned_users: usize,
    pub total_categories: usize,
    pub total_chats: usize,
    pub total_messages: usize,
    pub most_active_category: Option<String>,
    pub avg_chats_per_user: f64,
    /// Formatted as "+N% this month"
    pub registration_trend: String,
    pub system_health: String,
    pub category_feedback_ratios: HashMap<String, CategoryFeedback>,
}
