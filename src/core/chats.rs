//! Pure helpers behind the chat list and chat window: search filtering,
//! relative time labels, and telling the user's own messages apart.

use chrono::{DateTime, TimeZone, Utc};

use crate::backend::{Chat, Message};
use crate::core::session::Session;

/// Label used for timestamps that fall on the previous calendar day.
pub const YESTERDAY_LABEL: &str = "Yesterday";

/// Returns the chats whose name contains `query`, ignoring case.
/// An empty query returns every chat, in order.
pub fn filter_chats<'a>(chats: &'a [Chat], query: &str) -> Vec<&'a Chat> {
    if query.is_empty() {
        return chats.iter().collect();
    }
    let needle = query.to_lowercase();
    chats
        .iter()
        .filter(|chat| {
            chat.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Whether `message` was written by the signed-in user.
///
/// Computed on demand from the current session, never stored on the message.
pub fn is_mine(message: &Message, session: &Session) -> bool {
    message.user_id == session.user.id
}

/// Formats a chat-list timestamp relative to `now`, in `now`'s time zone:
/// same calendar day → `HH:MM`, the day before → `Yesterday`, else `05 Mar`.
pub fn relative_time_label<Tz: TimeZone>(ts: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local = ts.with_timezone(&now.timezone());
    let today = now.date_naive();
    let day = local.date_naive();

    if day == today {
        local.format("%H:%M").to_string()
    } else if Some(day) == today.pred_opt() {
        YESTERDAY_LABEL.to_string()
    } else {
        local.format("%d %b").to_string()
    }
}

/// `HH:MM` in the given zone, used under each message bubble.
pub fn clock_label<Tz: TimeZone>(ts: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(zone).format("%H:%M").to_string()
}

/// Initials for an avatar placeholder: first letter of up to two words.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
