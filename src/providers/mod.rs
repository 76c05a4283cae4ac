//! # Providers Module
//!
//! External collaborators behind async traits: deriving a persona prompt from
//! an uploaded document, and generating the next conversational reply from a
//! persona prompt plus ordered message history. The rest of the crate never
//! talks to a model directly.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with collaborator traits and OpenAI implementation

pub mod openai;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{GenerationError, IngestionError};

pub use self::openai::OpenAiProvider;

/// Who produced a message within a conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation history. Ordering within a history is
/// significant: it is exactly what the generator sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Derives a persona prompt from a document on disk.
///
/// The document at `document_path` is a scratch copy owned by the caller; the
/// deriver reads it once and must not retain it.
#[async_trait]
pub trait PersonaDeriver: Send + Sync {
    async fn derive_persona(
        &self,
        agent_name: &str,
        document_path: &Path,
    ) -> Result<String, IngestionError>;
}

/// Produces the next assistant message for a persona given the full history.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate_reply(
        &self,
        persona_prompt: &str,
        history: &[Message],
    ) -> Result<String, GenerationError>;
}

/// Invoke a generator under a timeout. Elapsed time maps to
/// [`GenerationError::Timeout`] so callers treat it like any other
/// recoverable generation failure.
pub async fn generate_with_timeout(
    generator: &dyn ResponseGenerator,
    persona_prompt: &str,
    history: &[Message],
    call_timeout: std::time::Duration,
) -> Result<String, GenerationError> {
    match tokio::time::timeout(call_timeout, generator.generate_reply(persona_prompt, history))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(call_timeout.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let m = Message::user("hello");
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "hello");

        let m = Message::assistant("hi back");
        assert_eq!(m.role, Role::Assistant);
    }

    #[test]
    fn test_role_serialization() {
        let m = Message::user("x");
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
