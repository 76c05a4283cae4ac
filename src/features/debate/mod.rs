//! # Feature: Persona Debate
//!
//! Scripted two-agent conversations. Each debater keeps a private message
//! history; every turn is mirrored into the opponent's history and logged to
//! a shared display transcript.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Normalized rebind reset (either slot change reseeds the debate)
//! - 1.0.0: Initial implementation with seeded opening and one exchange per trigger

pub mod orchestrator;

pub use orchestrator::{DebateSession, Exchange, Speaker, TranscriptEntry};
