//! # Feature: Persona Chat
//!
//! Single-agent conversation. The session binds one agent's persona prompt,
//! keeps the ordered message history, and asks the response generator for the
//! next assistant turn on every send.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with prompt-keyed history reset

use std::time::Duration;

use log::{debug, info};
use uuid::Uuid;

use crate::core::{preview, ChatError};
use crate::features::agents::Agent;
use crate::providers::{generate_with_timeout, Message, ResponseGenerator};

#[derive(Debug, Clone)]
struct Binding {
    agent_name: String,
    persona_prompt: String,
}

/// Conversation with a single persona agent.
///
/// Idle until an agent is selected. The history belongs to the bound persona
/// prompt: selecting an agent whose prompt differs from the current binding
/// clears it, while re-selecting the same prompt keeps the conversation.
#[derive(Debug, Default)]
pub struct ChatSession {
    binding: Option<Binding>,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the session to an agent.
    ///
    /// History is reset exactly when the bound persona prompt changes.
    pub fn select_agent(&mut self, agent: &Agent) {
        let prompt_changed = self
            .binding
            .as_ref()
            .map(|b| b.persona_prompt != agent.persona_prompt)
            .unwrap_or(true);

        if prompt_changed {
            info!("Chat rebound to '{}', history cleared", agent.name);
            self.history.clear();
        }

        self.binding = Some(Binding {
            agent_name: agent.name.clone(),
            persona_prompt: agent.persona_prompt.clone(),
        });
    }

    /// Send one user message and append the generated reply.
    ///
    /// The user turn is committed only together with the assistant turn: a
    /// failed or timed-out generation rolls the history back to exactly what
    /// it was before the call.
    pub async fn send(
        &mut self,
        text: &str,
        generator: &dyn ResponseGenerator,
        call_timeout: Duration,
    ) -> Result<String, ChatError> {
        let binding = self.binding.as_ref().ok_or(ChatError::NoAgentSelected)?;
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request_id = Uuid::new_v4();
        debug!(
            "[{}] Chat send to '{}': {}",
            request_id,
            binding.agent_name,
            preview(text)
        );

        self.history.push(Message::user(text));

        let reply = match generate_with_timeout(
            generator,
            &binding.persona_prompt,
            &self.history,
            call_timeout,
        )
        .await
        {
            Ok(reply) => reply,
            Err(e) => {
                // Roll back the user turn so the history is unchanged
                self.history.pop();
                return Err(e.into());
            }
        };

        debug!(
            "[{}] Reply from '{}': {}",
            request_id,
            binding.agent_name,
            preview(&reply)
        );

        self.history.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn active_agent(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.agent_name.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }
}
