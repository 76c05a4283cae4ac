//! Routes actions to the feature modules.

use log::{debug, warn};
use uuid::Uuid;

use crate::features::agents::UploadedDocument;
use crate::features::debate::Speaker;

use super::{Action, ActionError, Outcome, SessionContext, View};

impl SessionContext {
    /// Handle one user action against this session.
    ///
    /// Every call is logged with the session id and a per-request id. A
    /// returned error means the action changed nothing.
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome, ActionError> {
        let request_id = Uuid::new_v4();
        debug!("[{}] session {} action: {}", request_id, self.id, kind(&action));

        let result = self.handle(action).await;
        if let Err(e) = &result {
            warn!("[{}] session {} action failed: {}", request_id, self.id, e);
        }
        result
    }

    async fn handle(&mut self, action: Action) -> Result<Outcome, ActionError> {
        match action {
            Action::Navigate(view) => Ok(self.navigate(view)),

            Action::CreateAgent {
                name,
                filename,
                bytes,
            } => {
                let document = UploadedDocument::new(filename, bytes);
                let deriver = self.deriver.clone();
                self.registry
                    .create(&name, &document, deriver.as_ref(), self.request_timeout)
                    .await?;
                Ok(Outcome::AgentCreated { name })
            }

            Action::ShowAgent(name) => {
                let agent = self.registry.get(&name)?;
                Ok(Outcome::AgentPrompt {
                    name: agent.name.clone(),
                    persona_prompt: agent.persona_prompt.clone(),
                })
            }

            Action::SelectChatAgent(name) => {
                let agent = self.registry.get(&name)?;
                self.chat.select_agent(agent);
                Ok(Outcome::ChatAgentSelected { name })
            }

            Action::SendChat(text) => {
                let generator = self.generator.clone();
                let reply = self
                    .chat
                    .send(&text, generator.as_ref(), self.request_timeout)
                    .await?;
                let agent = self
                    .chat
                    .active_agent()
                    .unwrap_or_default()
                    .to_string();
                Ok(Outcome::ChatReply { agent, reply })
            }

            Action::BindDebater { slot, name } => {
                let agent = self.registry.get(&name)?;
                self.debate.bind(slot, agent);
                Ok(Outcome::DebaterBound { slot, name })
            }

            Action::Converse => {
                let generator = self.generator.clone();
                let exchange = self
                    .debate
                    .converse(generator.as_ref(), self.request_timeout)
                    .await?;
                Ok(Outcome::DebateExchange {
                    second_speaker: self
                        .debate
                        .participant(Speaker::Second)
                        .unwrap_or_default()
                        .to_string(),
                    second_reply: exchange.second_reply,
                    first_speaker: self
                        .debate
                        .participant(Speaker::First)
                        .unwrap_or_default()
                        .to_string(),
                    first_reply: exchange.first_reply,
                })
            }
        }
    }

    /// Switch views, with the source app's guard notices for views that need
    /// agents to exist first.
    fn navigate(&mut self, view: View) -> Outcome {
        self.view = view;
        match view {
            View::Agents if self.registry.is_empty() => Outcome::Notice(
                "No agents created yet. Go to Home to create agents.".to_string(),
            ),
            View::Agents => Outcome::AgentList {
                names: self.registry.list().iter().map(|n| n.to_string()).collect(),
            },
            View::Chat if self.registry.is_empty() => Outcome::Notice(
                "No agents created yet. Go to Home to create agents.".to_string(),
            ),
            View::Debate if self.registry.len() < 2 => Outcome::Notice(
                "You need at least two agents. Go to Home to create more agents.".to_string(),
            ),
            _ => Outcome::ViewChanged(view),
        }
    }
}

/// Action name for logging, without dragging message/document payloads along.
fn kind(action: &Action) -> &'static str {
    match action {
        Action::Navigate(_) => "navigate",
        Action::CreateAgent { .. } => "create_agent",
        Action::ShowAgent(_) => "show_agent",
        Action::SelectChatAgent(_) => "select_chat_agent",
        Action::SendChat(_) => "send_chat",
        Action::BindDebater { .. } => "bind_debater",
        Action::Converse => "converse",
    }
}
