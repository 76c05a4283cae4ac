//! # Debate Orchestrator
//!
//! Manages one debate between two persona agents: seeding, turn order, and
//! the cross-mirrored histories both debaters reply from.

use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::core::{preview, DebateError};
use crate::features::agents::Agent;
use crate::providers::{generate_with_timeout, Message, ResponseGenerator};

/// Which debate slot a participant or transcript line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    First,
    Second,
}

impl Speaker {
    fn label(&self) -> &'static str {
        match self {
            Speaker::First => "first",
            Speaker::Second => "second",
        }
    }

    fn opponent(&self) -> Speaker {
        match self {
            Speaker::First => Speaker::Second,
            Speaker::Second => Speaker::First,
        }
    }
}

/// One line of the shared display transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub content: String,
}

/// The two replies produced by one `converse` call, in speaking order.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub second_reply: String,
    pub first_reply: String,
}

#[derive(Debug, Clone)]
struct Debater {
    name: String,
    persona_prompt: String,
    history: Vec<Message>,
}

/// A two-agent debate.
///
/// The first debater is credited with a fixed opening line as soon as the
/// pair is formed. Before any model call, the opening is seeded into the
/// transcript, into the first debater's history as an assistant turn, and
/// into the second debater's history as a user turn. Binding either slot to
/// a different persona resets both histories and the transcript and reseeds.
#[derive(Debug)]
pub struct DebateSession {
    opening_line: String,
    pacing: Option<Duration>,
    first: Option<Debater>,
    second: Option<Debater>,
    transcript: Vec<TranscriptEntry>,
}

impl DebateSession {
    pub fn new(opening_line: impl Into<String>, pacing: Option<Duration>) -> Self {
        DebateSession {
            opening_line: opening_line.into(),
            pacing,
            first: None,
            second: None,
            transcript: Vec::new(),
        }
    }

    /// Bind an agent to a debate slot.
    ///
    /// A no-op when the slot already holds the same persona prompt. Any other
    /// change resets the whole debate and reseeds the opening.
    pub fn bind(&mut self, slot: Speaker, agent: &Agent) {
        let current = match slot {
            Speaker::First => &self.first,
            Speaker::Second => &self.second,
        };
        if let Some(debater) = current {
            if debater.persona_prompt == agent.persona_prompt {
                return;
            }
        }

        info!("Debate slot {} bound to '{}'", slot.label(), agent.name);

        let debater = Debater {
            name: agent.name.clone(),
            persona_prompt: agent.persona_prompt.clone(),
            history: Vec::new(),
        };
        match slot {
            Speaker::First => self.first = Some(debater),
            Speaker::Second => self.second = Some(debater),
        }

        self.reseed();
    }

    /// Reset both histories and the transcript, then seed the opening line.
    fn reseed(&mut self) {
        self.transcript.clear();
        self.transcript.push(TranscriptEntry {
            speaker: Speaker::First,
            content: self.opening_line.clone(),
        });

        if let Some(first) = self.first.as_mut() {
            first.history = vec![Message::assistant(self.opening_line.clone())];
        }
        if let Some(second) = self.second.as_mut() {
            second.history = vec![Message::user(self.opening_line.clone())];
        }
    }

    /// Advance the debate by exactly one exchange: the second debater speaks,
    /// then the first responds to it.
    ///
    /// Each turn is committed only after its generation succeeds. A failure on
    /// the first turn leaves the debate untouched; a failure on the response
    /// turn keeps the already-committed half and surfaces the error.
    pub async fn converse(
        &mut self,
        generator: &dyn ResponseGenerator,
        call_timeout: Duration,
    ) -> Result<Exchange, DebateError> {
        if self.first.is_none() {
            return Err(DebateError::MissingParticipant("first"));
        }
        if self.second.is_none() {
            return Err(DebateError::MissingParticipant("second"));
        }

        let second_reply = self.take_turn(Speaker::Second, generator, call_timeout).await?;

        if let Some(pause) = self.pacing {
            sleep(pause).await;
        }

        let first_reply = self.take_turn(Speaker::First, generator, call_timeout).await?;

        Ok(Exchange {
            second_reply,
            first_reply,
        })
    }

    /// One debater speaks from its own history; the reply is mirrored into
    /// the opponent's history and appended to the transcript.
    async fn take_turn(
        &mut self,
        slot: Speaker,
        generator: &dyn ResponseGenerator,
        call_timeout: Duration,
    ) -> Result<String, DebateError> {
        let (speaker, prompt, history) = match slot {
            Speaker::First => self.first.as_ref(),
            Speaker::Second => self.second.as_ref(),
        }
        .map(|d| (d.name.clone(), d.persona_prompt.clone(), d.history.clone()))
        .ok_or(DebateError::MissingParticipant(slot.label()))?;

        debug!("Debate turn: '{}' replying to {} prior turns", speaker, history.len());

        let reply = generate_with_timeout(generator, &prompt, &history, call_timeout).await?;

        debug!("'{}' said: {}", speaker, preview(&reply));

        // Commit only after success: own history as assistant, opponent as user
        let (own, opponent) = match slot {
            Speaker::First => (self.first.as_mut(), self.second.as_mut()),
            Speaker::Second => (self.second.as_mut(), self.first.as_mut()),
        };
        let own = own.ok_or(DebateError::MissingParticipant(slot.label()))?;
        let opponent = opponent.ok_or(DebateError::MissingParticipant(slot.opponent().label()))?;

        own.history.push(Message::assistant(reply.clone()));
        opponent.history.push(Message::user(reply.clone()));
        self.transcript.push(TranscriptEntry {
            speaker: slot,
            content: reply.clone(),
        });

        Ok(reply)
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Display name bound to a slot, if any.
    pub fn participant(&self, slot: Speaker) -> Option<&str> {
        match slot {
            Speaker::First => self.first.as_ref(),
            Speaker::Second => self.second.as_ref(),
        }
        .map(|d| d.name.as_str())
    }

    /// Private history of a slot, if bound.
    pub fn debater_history(&self, slot: Speaker) -> Option<&[Message]> {
        match slot {
            Speaker::First => self.first.as_ref(),
            Speaker::Second => self.second.as_ref(),
        }
        .map(|d| d.history.as_slice())
    }

    pub fn is_ready(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GenerationError;
    use crate::providers::Role;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    const OPENING: &str = "Hi there! Nice to meet you.";
    const TIMEOUT: Duration = Duration::from_secs(5);

    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, String>>>,
        snapshots: Mutex<Vec<(String, Vec<Message>)>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, String>>) -> Self {
            ScriptedGenerator {
                replies: Mutex::new(replies),
                snapshots: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResponseGenerator for ScriptedGenerator {
        async fn generate_reply(
            &self,
            persona_prompt: &str,
            history: &[Message],
        ) -> Result<String, GenerationError> {
            self.snapshots
                .lock()
                .unwrap()
                .push((persona_prompt.to_string(), history.to_vec()));
            let mut replies = self.replies.lock().unwrap();
            match replies.remove(0) {
                Ok(r) => Ok(r),
                Err(e) => Err(GenerationError::Upstream(e)),
            }
        }
    }

    fn agent(name: &str) -> Agent {
        Agent {
            name: name.to_string(),
            persona_prompt: format!("speak as {name}"),
            created_at: Utc::now(),
        }
    }

    fn bound_session() -> DebateSession {
        let mut debate = DebateSession::new(OPENING, None);
        debate.bind(Speaker::First, &agent("Alice"));
        debate.bind(Speaker::Second, &agent("Bob"));
        debate
    }

    #[test]
    fn test_binding_pair_seeds_opening() {
        let debate = bound_session();

        assert_eq!(
            debate.transcript(),
            &[TranscriptEntry {
                speaker: Speaker::First,
                content: OPENING.to_string(),
            }]
        );
        assert_eq!(
            debate.debater_history(Speaker::First).unwrap(),
            &[Message::assistant(OPENING)]
        );
        assert_eq!(
            debate.debater_history(Speaker::Second).unwrap(),
            &[Message::user(OPENING)]
        );
    }

    #[test]
    fn test_rebinding_either_slot_reseeds() {
        let mut debate = bound_session();
        debate.bind(Speaker::Second, &agent("Carol"));

        // Whole debate reset and reseeded
        assert_eq!(debate.transcript().len(), 1);
        assert_eq!(debate.participant(Speaker::Second), Some("Carol"));
        assert_eq!(
            debate.debater_history(Speaker::Second).unwrap(),
            &[Message::user(OPENING)]
        );

        debate.bind(Speaker::First, &agent("Dave"));
        assert_eq!(debate.transcript().len(), 1);
        assert_eq!(
            debate.debater_history(Speaker::First).unwrap(),
            &[Message::assistant(OPENING)]
        );
    }

    #[test]
    fn test_rebinding_same_prompt_is_noop() {
        let mut debate = bound_session();
        let alice = agent("Alice");
        debate.bind(Speaker::First, &alice);
        debate.bind(Speaker::First, &alice);

        assert_eq!(debate.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_converse_requires_both_slots() {
        let mut debate = DebateSession::new(OPENING, None);
        debate.bind(Speaker::First, &agent("Alice"));
        let generator = ScriptedGenerator::new(vec![]);

        let err = debate.converse(&generator, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, DebateError::MissingParticipant("second")));
    }

    #[tokio::test]
    async fn test_one_exchange_appends_second_then_first() {
        let mut debate = bound_session();
        let generator = ScriptedGenerator::new(vec![
            Ok("Bob's point".to_string()),
            Ok("Alice's rebuttal".to_string()),
        ]);

        let exchange = debate.converse(&generator, TIMEOUT).await.unwrap();
        assert_eq!(exchange.second_reply, "Bob's point");
        assert_eq!(exchange.first_reply, "Alice's rebuttal");

        let transcript = debate.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].speaker, Speaker::Second);
        assert_eq!(transcript[1].content, "Bob's point");
        assert_eq!(transcript[2].speaker, Speaker::First);
        assert_eq!(transcript[2].content, "Alice's rebuttal");

        // Bob replied from his pre-exchange history (just the seed)
        let snapshots = generator.snapshots.lock().unwrap();
        assert_eq!(snapshots[0].0, "speak as Bob");
        assert_eq!(snapshots[0].1, vec![Message::user(OPENING)]);
        // Alice replied from a history already containing Bob's turn
        assert_eq!(snapshots[1].0, "speak as Alice");
        assert_eq!(
            snapshots[1].1,
            vec![Message::assistant(OPENING), Message::user("Bob's point")]
        );
    }

    #[tokio::test]
    async fn test_two_exchanges_alternate_strictly() {
        let mut debate = bound_session();
        let generator = ScriptedGenerator::new(vec![
            Ok("b1".to_string()),
            Ok("a1".to_string()),
            Ok("b2".to_string()),
            Ok("a2".to_string()),
        ]);

        debate.converse(&generator, TIMEOUT).await.unwrap();
        debate.converse(&generator, TIMEOUT).await.unwrap();

        let speakers: Vec<Speaker> = debate.transcript().iter().map(|e| e.speaker).collect();
        assert_eq!(
            speakers,
            vec![
                Speaker::First, // seed
                Speaker::Second,
                Speaker::First,
                Speaker::Second,
                Speaker::First,
            ]
        );
        assert_eq!(debate.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_histories_stay_cross_mirrored() {
        let mut debate = bound_session();
        let generator = ScriptedGenerator::new(vec![
            Ok("b1".to_string()),
            Ok("a1".to_string()),
        ]);
        debate.converse(&generator, TIMEOUT).await.unwrap();

        let first = debate.debater_history(Speaker::First).unwrap();
        let second = debate.debater_history(Speaker::Second).unwrap();

        assert_eq!(first.len(), second.len());
        for (mine, theirs) in first.iter().zip(second.iter()) {
            assert_eq!(mine.content, theirs.content);
            // Same content, opposite roles
            match mine.role {
                Role::User => assert_eq!(theirs.role, Role::Assistant),
                Role::Assistant => assert_eq!(theirs.role, Role::User),
            }
        }
    }

    #[tokio::test]
    async fn test_first_turn_failure_leaves_debate_untouched() {
        let mut debate = bound_session();
        let generator = ScriptedGenerator::new(vec![Err("down".to_string())]);

        let err = debate.converse(&generator, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, DebateError::Generation(_)));

        assert_eq!(debate.transcript().len(), 1);
        assert_eq!(debate.debater_history(Speaker::Second).unwrap().len(), 1);
        assert_eq!(debate.debater_history(Speaker::First).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_response_turn_failure_keeps_committed_half() {
        let mut debate = bound_session();
        let generator = ScriptedGenerator::new(vec![
            Ok("b1".to_string()),
            Err("down".to_string()),
        ]);

        let err = debate.converse(&generator, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, DebateError::Generation(_)));

        // Second debater's turn was committed before the failure
        let transcript = debate.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].speaker, Speaker::Second);
        assert_eq!(
            debate.debater_history(Speaker::First).unwrap().last(),
            Some(&Message::user("b1"))
        );
    }
}
