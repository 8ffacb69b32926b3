//! Core domain types for PageForge generation and publishing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Website status value written by the publisher once all pages are stored.
pub const STATUS_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Chat messages
// ---------------------------------------------------------------------------

/// The speaker of a chat message, matching the wire strings
/// `"system"` / `"user"` / `"assistant"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in a conversation. An ordered `Vec<ChatMessage>` is a
/// conversation; order is chronological and must be preserved across copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed sections
// ---------------------------------------------------------------------------

/// A named page section extracted from a generated markdown document.
///
/// `name` is the first line of a `## `-delimited block; `content` is the
/// inner text of its ```` ```html ```` fenced code block. Sections are
/// produced in document order, which becomes the page ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    pub name: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Stored rows
// ---------------------------------------------------------------------------

/// A page row as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Unique page identifier (UUID v7, time-sortable).
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Owning website.
    pub website_id: String,
    /// Page title (the section name).
    pub title: String,
    /// Page HTML content.
    pub content: String,
    /// SHA-256 hash of the content.
    pub content_hash: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl PageRecord {
    /// Build a new page row from a parsed section.
    pub fn new(user_id: &str, website_id: &str, section: &PageSection) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            website_id: website_id.to_string(),
            title: section.name.clone(),
            content: section.content.clone(),
            content_hash: content_hash(&section.content),
            created_at: Utc::now(),
        }
    }
}

/// Compute the SHA-256 hash of page content as lowercase hex.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A website row as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Lifecycle status; the publisher sets [`STATUS_COMPLETED`].
    pub status: String,
    /// Page titles in document order.
    pub pages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_strings() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );

        let parsed: Role = serde_json::from_str(r#""assistant""#).unwrap();
        assert_eq!(parsed, Role::Assistant);
    }

    #[test]
    fn chat_message_serialization() {
        let msg = ChatMessage::user("build me a site");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"build me a site"}"#);

        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn page_record_from_section() {
        let section = PageSection {
            name: "Home".into(),
            content: "<p>hi</p>".into(),
        };
        let record = PageRecord::new("user-1", "site-1", &section);
        assert_eq!(record.title, "Home");
        assert_eq!(record.content, "<p>hi</p>");
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.website_id, "site-1");
        assert!(!record.id.is_empty());
        assert_eq!(record.content_hash, content_hash("<p>hi</p>"));
    }

    #[test]
    fn content_hash_is_sha256_hex() {
        let hash = content_hash("hello world");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
