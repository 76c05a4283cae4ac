//! # Features Module
//!
//! Feature modules: agent creation, single-persona chat, two-agent debate.

pub mod agents;
pub mod chat;
pub mod debate;

// Re-export feature items
pub use agents::{Agent, AgentRegistry, DocumentKind, UploadedDocument};
pub use chat::ChatSession;
pub use debate::{DebateSession, Exchange, Speaker, TranscriptEntry};
