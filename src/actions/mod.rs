//! # Actions Module
//!
//! The explicit action model replacing a render-loop UI: every user
//! interaction is an [`Action`] dispatched against one session's
//! [`SessionContext`], yielding an [`Outcome`] for the caller to render.
//! Errors are surfaced, never fatal, and leave session state unchanged.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial action/outcome model with session store

pub mod context;
pub mod dispatcher;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ChatError, DebateError, RegistryError};
use crate::features::debate::Speaker;

pub use context::{SessionContext, SessionId, SessionStore};

/// The four user-facing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Home,
    Agents,
    Chat,
    Debate,
}

/// One user interaction.
#[derive(Debug, Clone)]
pub enum Action {
    Navigate(View),
    CreateAgent {
        name: String,
        filename: String,
        bytes: Vec<u8>,
    },
    ShowAgent(String),
    SelectChatAgent(String),
    SendChat(String),
    BindDebater {
        slot: Speaker,
        name: String,
    },
    Converse,
}

/// What a renderer needs to show after an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Outcome {
    ViewChanged(View),
    /// Informational guard message (e.g. "no agents created yet")
    Notice(String),
    AgentCreated {
        name: String,
    },
    AgentList {
        names: Vec<String>,
    },
    AgentPrompt {
        name: String,
        persona_prompt: String,
    },
    ChatAgentSelected {
        name: String,
    },
    ChatReply {
        agent: String,
        reply: String,
    },
    DebaterBound {
        slot: Speaker,
        name: String,
    },
    DebateExchange {
        second_speaker: String,
        second_reply: String,
        first_speaker: String,
        first_reply: String,
    },
}

/// Any error an action can surface. All variants are recoverable; the
/// session that produced one is unchanged by the failed action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Debate(#[from] DebateError),
}
