//! Typed errors for ingestion, generation, and session operations.
//!
//! Every error here is recoverable: callers surface it and leave session
//! state exactly as it was before the failing operation.

use thiserror::Error;

/// Errors raised while turning an uploaded document into a persona agent.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Agent name was empty or whitespace-only.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// No document bytes were provided.
    #[error("a document is required to create an agent")]
    EmptyDocument,

    /// The uploaded filename has no recognized document extension.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Writing or removing the scratch copy of the document failed.
    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),

    /// The persona deriver itself failed.
    #[error("persona derivation failed: {0}")]
    Derivation(String),

    /// The persona deriver did not answer within the configured timeout.
    #[error("persona derivation timed out after {0}s")]
    Timeout(u64),
}

/// Errors raised while generating a conversational reply.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The upstream model call failed.
    #[error("reply generation failed: {0}")]
    Upstream(String),

    /// The model returned a completion with no content.
    #[error("model returned an empty reply")]
    EmptyReply,

    /// The generator did not answer within the configured timeout.
    #[error("reply generation timed out after {0}s")]
    Timeout(u64),
}

/// Errors raised by the agent registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An agent with this name already exists.
    #[error("an agent named '{0}' already exists")]
    NameTaken(String),

    /// No agent with this name is registered.
    #[error("no agent named '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),
}

/// Errors raised by a single-agent chat session.
#[derive(Debug, Error)]
pub enum ChatError {
    /// `send` was called with no agent selected.
    #[error("select an agent before chatting")]
    NoAgentSelected,

    /// `send` was called with empty or whitespace-only text.
    #[error("message must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors raised by a two-agent debate session.
#[derive(Debug, Error)]
pub enum DebateError {
    /// `converse` was called before both participants were bound.
    #[error("debater {0} is not bound")]
    MissingParticipant(&'static str),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
