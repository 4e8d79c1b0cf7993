//! Wire types for the auth and chats endpoints.
//!
//! The backend speaks snake_case JSON with an `action` discriminator on every
//! POST body. Response objects are deserialized leniently: optional columns
//! may be missing or `null`, and timestamps may come with or without an offset.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Domain Types
// ============================================================================

/// A registered user. Immutable once created by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Successful response of the auth endpoint (login and register alike).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// A conversation visible to the current user.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
    /// Direct chats created through `create_chat` have no name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_group: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_message_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unread_count: i64,
}

impl Chat {
    /// Name shown in the list and the chat header.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Chat #{}", self.id),
        }
    }
}

/// A single message in a conversation.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    /// Author id. Compared against the session user to tell mine from theirs.
    pub user_id: i64,
    /// Author display name. The send response omits it.
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields collected by the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Fields collected by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Body of a POST to the auth endpoint.
#[derive(Serialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum AuthRequest<'a> {
    Login {
        email: &'a str,
        password: &'a str,
    },
    Register {
        email: &'a str,
        password: &'a str,
        name: &'a str,
    },
}

/// Body of a POST to the chats endpoint.
#[derive(Serialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum ChatRequest<'a> {
    SendMessage { chat_id: i64, text: &'a str },
    CreateChat { other_user_id: i64 },
}

// ============================================================================
// Response Envelopes
// ============================================================================

#[derive(Deserialize, Debug)]
pub(crate) struct ChatsEnvelope {
    #[serde(default)]
    pub chats: Vec<Chat>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct MessagesEnvelope {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SentMessageEnvelope {
    pub message: Message,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CreatedChatEnvelope {
    pub chat_id: i64,
}

/// Error body returned with non-2xx statuses.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// Lenient Deserializers
// ============================================================================

/// Parses an ISO-8601 timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_without_email_deserializes() {
        let user: User = serde_json::from_str(r#"{"id":1,"name":"A"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "A");
        assert_eq!(user.email, "");
        assert!(user.avatar_url.is_none());
    }

    #[test]
    fn test_user_serialization_skips_missing_avatar() {
        let user = User {
            id: 3,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            avatar_url: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("avatar_url"));
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_login_request_serializes_with_action_tag() {
        let body = AuthRequest::Login {
            email: "a@b.com",
            password: "secret",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"action": "login", "email": "a@b.com", "password": "secret"})
        );
    }

    #[test]
    fn test_register_request_includes_name() {
        let body = AuthRequest::Register {
            email: "a@b.com",
            password: "secret",
            name: "Ann",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["action"], "register");
        assert_eq!(value["name"], "Ann");
    }

    #[test]
    fn test_send_message_request_shape() {
        let body = ChatRequest::SendMessage {
            chat_id: 42,
            text: "hi",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"action": "send_message", "chat_id": 42, "text": "hi"})
        );
    }

    #[test]
    fn test_chat_with_nulls_deserializes() {
        let json = r#"{
            "id": 7,
            "name": null,
            "is_group": null,
            "avatar_url": null,
            "last_message": null,
            "last_message_time": null,
            "unread_count": 0
        }"#;
        let chat: Chat = serde_json::from_str(json).unwrap();
        assert_eq!(chat.id, 7);
        assert!(!chat.is_group);
        assert!(chat.last_message_time.is_none());
        assert_eq!(chat.display_name(), "Chat #7");
    }

    #[test]
    fn test_chat_display_name_prefers_name() {
        let chat: Chat = serde_json::from_str(r#"{"id":1,"name":"Design team"}"#).unwrap();
        assert_eq!(chat.display_name(), "Design team");
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp("2024-05-01T12:30:45.123456").unwrap();
        assert_eq!(
            ts.timestamp(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap().timestamp()
        );
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let ts = parse_timestamp("2024-05-01T15:30:45+03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
    }

    #[test]
    fn test_sent_message_without_author_name() {
        let json = r#"{"message":{"id":9,"created_at":"2024-05-01T10:00:00","user_id":1,"text":"hi"}}"#;
        let envelope: SentMessageEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.message.text, "hi");
        assert_eq!(envelope.message.user_id, 1);
        assert!(envelope.message.user_name.is_none());
        assert!(envelope.message.created_at.is_some());
    }
}
