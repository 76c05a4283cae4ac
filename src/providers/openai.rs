//! OpenAI-backed persona derivation and reply generation.

use std::path::Path;

use async_trait::async_trait;
use log::{debug, info};
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};

use crate::core::{GenerationError, IngestionError};

use super::{Message, PersonaDeriver, ResponseGenerator, Role};

/// Longest document slice handed to the model when deriving a persona
const DERIVATION_INPUT_LIMIT: usize = 8000;

/// Both collaborators in one struct, backed by the OpenAI chat API.
///
/// Persona derivation reads plain-text and CSV documents directly; PDF and
/// DOCX extraction belongs to richer `PersonaDeriver` implementations and is
/// reported as unsupported here.
pub struct OpenAiProvider {
    model: String,
}

impl OpenAiProvider {
    pub fn new(model: String) -> Self {
        Self { model }
    }

    fn system_message(content: String) -> ChatCompletionMessage {
        ChatCompletionMessage {
            role: ChatCompletionMessageRole::System,
            content: Some(content),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }

    fn user_message(content: String) -> ChatCompletionMessage {
        ChatCompletionMessage {
            role: ChatCompletionMessageRole::User,
            content: Some(content),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }

    fn history_message(message: &Message) -> ChatCompletionMessage {
        let role = match message.role {
            Role::User => ChatCompletionMessageRole::User,
            Role::Assistant => ChatCompletionMessageRole::Assistant,
        };
        ChatCompletionMessage {
            role,
            content: Some(message.content.clone()),
            name: None,
            function_call: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Extract first-choice content, treating a missing or blank completion
    /// as an error rather than an empty string.
    fn first_choice_content(completion: ChatCompletion) -> Option<String> {
        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
impl PersonaDeriver for OpenAiProvider {
    async fn derive_persona(
        &self,
        agent_name: &str,
        document_path: &Path,
    ) -> Result<String, IngestionError> {
        let extension = document_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        // Binary extraction is a richer deriver's job
        if extension == "pdf" || extension == "docx" {
            return Err(IngestionError::UnsupportedFormat(format!(
                ".{extension} extraction is not supported by the OpenAI provider"
            )));
        }

        let text = std::fs::read_to_string(document_path)?;

        let truncated = if text.len() > DERIVATION_INPUT_LIMIT {
            debug!(
                "Truncating document for derivation ({} -> {} bytes)",
                text.len(),
                DERIVATION_INPUT_LIMIT
            );
            let mut end = DERIVATION_INPUT_LIMIT;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...\n\n[Document truncated]", &text[..end])
        } else {
            text
        };

        info!(
            "Deriving persona prompt for '{}' ({} byte document)",
            agent_name,
            truncated.len()
        );

        let completion = ChatCompletion::builder(
            &self.model,
            vec![
                Self::system_message(
                    "You write persona prompts. Given a document, produce a system \
                     prompt that makes an assistant speak in the voice, knowledge, and \
                     perspective of the document's author or subject. Output only the \
                     persona prompt itself."
                        .to_string(),
                ),
                Self::user_message(format!(
                    "The persona's name is {agent_name}. Source document:\n\n{truncated}"
                )),
            ],
        )
        .create()
        .await
        .map_err(|e| IngestionError::Derivation(e.to_string()))?;

        Self::first_choice_content(completion)
            .ok_or_else(|| IngestionError::Derivation("model returned no persona prompt".into()))
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiProvider {
    async fn generate_reply(
        &self,
        persona_prompt: &str,
        history: &[Message],
    ) -> Result<String, GenerationError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Self::system_message(persona_prompt.to_string()));
        messages.extend(history.iter().map(Self::history_message));

        debug!("Requesting reply ({} history turns)", history.len());

        let completion = ChatCompletion::builder(&self.model, messages)
            .create()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        Self::first_choice_content(completion).ok_or(GenerationError::EmptyReply)
    }
}
