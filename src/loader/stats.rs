//! Dashboard statistics derived from the loaded resources.
//!
//! Pure functions over in-memory snapshots; given the same inputs they
//! always produce the same output.

use chrono::{Duration, NaiveDateTime};
use std::collections::{HashMap, HashSet};

use crate::models::{Category, CategoryFeedback, Chat, DashboardStats, Message, Session, User};

/// Build the full stats snapshot from the current resource values.
pub(crate) fn derive_stats(
    users: &[User],
    categories: &[Category],
    chats: &[Chat],
    messages: &[Message],
    sessions: &[Session],
    now: NaiveDateTime,
) -> DashboardStats {
    DashboardStats {
        total_users: users.iter().filter(|u| !u.banned).count(),
        active_users: sessions.iter().filter(|s| s.active).count(),
        inactive_users: sessions.iter().filter(|s| !s.active).count(),
        banned_users: users.iter().filter(|u| u.banned).count(),
        total_categories: categories.len(),
        total_chats: chats.len(),
        total_messages: messages.len(),
        most_active_category: most_active_category(messages),
        avg_chats_per_user: avg_chats_per_user(chats),
        registration_trend: registration_trend(users, now),
        system_health: "Operational".to_string(),
        category_feedback_ratios: category_feedback_ratios(messages, categories),
    }
}

/// The category with the strictly greatest message count.
///
/// Ties keep the first category encountered in message order.
/// Uncategorized messages are ignored; no categorized messages yields
/// `None`.
pub(crate) fn most_active_category(messages: &[Message]) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for message in messages {
        if let Some(category) = message.category.as_deref() {
            if !counts.contains_key(category) {
                order.push(category);
            }
            *counts.entry(category).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for category in order {
        let count = counts[category];
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
}

/// Chats divided by the number of distinct users contributing chats.
pub(crate) fn avg_chats_per_user(chats: &[Chat]) -> f64 {
    if chats.is_empty() {
        return 0.0;
    }
    let distinct_users: HashSet<i64> = chats.iter().map(|chat| chat.user_id).collect();
    chats.len() as f64 / distinct_users.len() as f64
}

/// Percentage of users who joined within the last 30 days, floored,
/// formatted as "+N% this month".
pub(crate) fn registration_trend(users: &[User], now: NaiveDateTime) -> String {
    if users.is_empty() {
        return "+0% this month".to_string();
    }
    let cutoff = now - Duration::days(30);
    let recent = users
        .iter()
        .filter(|u| u.joined_at.is_some_and(|joined| joined >= cutoff))
        .count();
    let trend = recent * 100 / users.len();
    format!("+{trend}% this month")
}

/// Like/dislike counts and rounded percentages per category name.
///
/// Categories with no matching messages are omitted entirely. Messages
/// without feedback count toward `total_messages` but not `total`.
pub(crate) fn category_feedback_ratios(
    messages: &[Message],
    categories: &[Category],
) -> HashMap<String, CategoryFeedback> {
    let mut ratios = HashMap::new();
    if messages.is_empty() || categories.is_empty() {
        return ratios;
    }

    for category in categories {
        let matching: Vec<&Message> = messages
            .iter()
            .filter(|m| m.category.as_deref() == Some(category.name.as_str()))
            .collect();
        if matching.is_empty() {
            continue;
        }

        let likes = matching.iter().filter(|m| m.like == Some(true)).count();
        let dislikes = matching.iter().filter(|m| m.like == Some(false)).count();
        let total = likes + dislikes;
        let (like_ratio, dislike_ratio) = if total > 0 {
            (
                (likes as f64 / total as f64 * 100.0).round() as u32,
                (dislikes as f64 / total as f64 * 100.0).round() as u32,
            )
        } else {
            (0, 0)
        };

        ratios.insert(
            category.name.clone(),
            CategoryFeedback {
                likes,
                dislikes,
                total,
                like_ratio,
                dislike_ratio,
                total_messages: matching.len(),
            },
        );
    }
    ratios
}
