// Core layer - shared types, configuration, and errors
pub mod core;

// Features layer - all feature modules
pub mod features;

// Providers layer - external model collaborators
pub mod providers;

// Application layer - actions, dispatcher, session store
pub mod actions;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Agents
    Agent, AgentRegistry, DocumentKind, UploadedDocument,
    // Chat
    ChatSession,
    // Debate
    DebateSession, Exchange, Speaker, TranscriptEntry,
};

// Re-export provider items
pub use providers::{Message, OpenAiProvider, PersonaDeriver, ResponseGenerator, Role};

// Re-export action items
pub use actions::{Action, ActionError, Outcome, SessionContext, SessionStore, View};
