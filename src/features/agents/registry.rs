//! In-memory agent registry.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::RegistryError;
use crate::providers::PersonaDeriver;

use super::ingest::{derive_from_upload, UploadedDocument};

/// A persona agent: a user-chosen name bound to a derived persona prompt.
/// Immutable once registered; lives for the duration of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub persona_prompt: String,
    pub created_at: DateTime<Utc>,
}

/// Holds every registered agent, in creation order.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Agent>,
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an agent from an uploaded document.
    ///
    /// Runs the ingestion pipeline (scratch write, persona derivation under
    /// `call_timeout`, scratch cleanup) and registers the agent only when
    /// derivation succeeded. Name collisions are rejected; the source of this
    /// behavior silently overwrote, which invalidated other views' bindings.
    pub async fn create(
        &mut self,
        name: &str,
        document: &UploadedDocument,
        deriver: &dyn PersonaDeriver,
        call_timeout: Duration,
    ) -> Result<&Agent, RegistryError> {
        let name = name.trim();
        if self.agents.contains_key(name) {
            return Err(RegistryError::NameTaken(name.to_string()));
        }

        let persona_prompt = derive_from_upload(name, document, deriver, call_timeout).await?;

        info!(
            "Registered agent '{}' ({} byte persona prompt)",
            name,
            persona_prompt.len()
        );

        let agent = Agent {
            name: name.to_string(),
            persona_prompt,
            created_at: Utc::now(),
        };
        self.order.push(name.to_string());
        self.agents.insert(name.to_string(), agent);
        Ok(&self.agents[name])
    }

    /// Agent names in creation order.
    pub fn list(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Result<&Agent, RegistryError> {
        self.agents
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
