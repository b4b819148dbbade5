//! Chat-completion model trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A language model that answers a chat transcript with text.
///
/// Implementations wrap a specific chat-completion backend. The generator
/// treats the returned text as untrusted and parses it itself.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `messages` and return the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// A short name identifying the backend in errors and logs.
    fn name(&self) -> &str;
}
