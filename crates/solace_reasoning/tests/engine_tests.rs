//! Integration tests for the CompanionEngine.
//!
//! The backend is replaced by in-process clients so the full respond()
//! pipeline runs without network calls.

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use solace_core::engagement::DryReplyTier;
use solace_core::{Catalogue, Category, Conversation, Turn};
use solace_reasoning::api_types::{Message, MessagesResponse};
use solace_reasoning::engine::CompanionEngine;
use solace_reasoning::llm::{CompletionParams, LlmClient};
use solace_reasoning::pools;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::Mutex;

// ============================================================================
// Mock LLM Clients
// ============================================================================

/// Returns a sequence of pre-configured responses, then empty ones.
/// Records every system brief it receives.
struct MockLlmClient {
    responses: Mutex<Vec<MessagesResponse>>,
    briefs: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockLlmClient {
    fn new(responses: Vec<MessagesResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            briefs: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn with_text(text: &str) -> Self {
        Self::new(vec![MessagesResponse::from_text(text, Some("end_turn"))])
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        system: &str,
        _messages: Vec<Message>,
        _params: CompletionParams,
    ) -> Result<MessagesResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.briefs.lock().await.push(system.to_string());
        let mut queue = self.responses.lock().await;
        if queue.is_empty() {
            Ok(MessagesResponse::from_text("", None))
        } else {
            Ok(queue.remove(0))
        }
    }

    fn name(&self) -> &str {
        "test-mock"
    }
}

/// Always fails, like a backend that is down.
struct FailingClient;

#[async_trait]
impl LlmClient for FailingClient {
    async fn complete(
        &self,
        _system: &str,
        _messages: Vec<Message>,
        _params: CompletionParams,
    ) -> Result<MessagesResponse> {
        anyhow::bail!("connection refused")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Answers only after a long delay.
struct SlowClient;

#[async_trait]
impl LlmClient for SlowClient {
    async fn complete(
        &self,
        _system: &str,
        _messages: Vec<Message>,
        _params: CompletionParams,
    ) -> Result<MessagesResponse> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok(MessagesResponse::from_text("too late", None))
    }

    fn name(&self) -> &str {
        "slow"
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn engine_with(client: Option<Arc<dyn LlmClient>>) -> CompanionEngine {
    CompanionEngine::new(Arc::new(Catalogue::builtin()), client)
}

fn conversation(turns: Vec<Turn>) -> Conversation {
    Conversation::new(turns).unwrap()
}

// ============================================================================
// Local-only scenarios
// ============================================================================

#[tokio::test]
async fn test_direct_mood_asks_for_context() {
    let engine = engine_with(None);
    let result = engine
        .respond(&conversation(vec![Turn::user("I'm anxious")]))
        .await;
    assert!(pools::CONTEXT_QUESTIONS.contains(&result.text.as_str()));
    assert!(result.media.is_empty());
    assert_eq!(result.mood.dominant, Category::Anxiety);
}

#[tokio::test]
async fn test_crisis_turn_gets_helplines() {
    let engine = engine_with(None);
    let result = engine
        .respond(&conversation(vec![
            Turn::user("hey"),
            Turn::agent("Hey! What's on your mind?"),
            Turn::user("I want to jump off the roof"),
        ]))
        .await;
    assert!(result.text.contains("988"));
    assert!(result.media.is_empty());
}

#[tokio::test]
async fn test_hopelessness_after_history_gets_helplines_without_media() {
    let engine = engine_with(None);
    for latest in ["i feel so lost", "honestly i feel helpless"] {
        let result = engine
            .respond(&conversation(vec![
                Turn::user("i've been so sad and anxious"),
                Turn::agent("I'm here. What's been going on?"),
                Turn::user("work stress too"),
                Turn::agent("That's a lot to carry at once."),
                Turn::user(latest),
            ]))
            .await;
        assert!(result.text.contains("988"), "{latest:?}: {}", result.text);
        assert!(result.media.is_empty(), "{latest:?} carried media");
    }
}

#[tokio::test]
async fn test_five_dry_turns_respect_silence() {
    let engine = engine_with(None);
    let result = engine
        .respond(&conversation((0..5).map(|_| Turn::user("ok")).collect()))
        .await;
    assert!(pools::dry_reply(DryReplyTier::RespectSilence).contains(&result.text.as_str()));
    assert!(result.media.is_empty());
}

#[tokio::test]
async fn test_question_after_context_ask_is_answered() {
    let engine = engine_with(None);
    let result = engine
        .respond(&conversation(vec![
            Turn::user("I'm stressed"),
            Turn::agent("I hear you. What's been happening that's making you feel this way?"),
            Turn::user("why does this happen"),
        ]))
        .await;
    assert!(pools::question_answers(Category::Stress).contains(&result.text.as_str()));
    assert!(!pools::analysis(Category::Stress).contains(&result.text.as_str()));
    assert!(result.media.is_empty());
}

#[tokio::test]
async fn test_media_offered_once_mood_is_clear() {
    let engine = engine_with(None);
    let result = engine
        .respond(&conversation(vec![
            Turn::user("i've been so anxious lately"),
            Turn::agent("That sounds unsettling. What's been going on?"),
            Turn::user("my thoughts keep racing at night"),
        ]))
        .await;
    assert_eq!(result.mood.dominant, Category::Anxiety);
    assert!(!result.media.is_empty());
    let anxiety = Catalogue::builtin();
    assert_eq!(
        result.media,
        anxiety.get(Category::Anxiety).unwrap().media
    );
}

#[tokio::test]
async fn test_same_seed_same_reply() {
    let engine = engine_with(None);
    let conv = conversation(vec![
        Turn::user("work is a lot"),
        Turn::agent("That sounds like a lot of pressure."),
        Turn::user("yeah the pressure keeps building"),
    ]);
    let first = engine
        .respond_with_rng(&conv, &mut StdRng::seed_from_u64(7))
        .await;
    let second = engine
        .respond_with_rng(&conv, &mut StdRng::seed_from_u64(7))
        .await;
    assert_eq!(first.text, second.text);
    assert_eq!(first.mood, second.mood);
}

// ============================================================================
// Backend behaviour
// ============================================================================

#[tokio::test]
async fn test_backend_reply_is_returned() {
    let client = Arc::new(MockLlmClient::with_text("  That sounds exhausting.  "));
    let engine = engine_with(Some(client.clone())).with_persona("Rowan");
    let result = engine
        .respond(&conversation(vec![Turn::user("work has been draining")]))
        .await;
    assert_eq!(result.text, "That sounds exhausting.");
    assert_eq!(client.calls(), 1);

    let briefs = client.briefs.lock().await;
    assert!(briefs[0].starts_with("You are Rowan"));
    assert!(briefs[0].contains("Detected mood: stress"));
}

#[tokio::test]
async fn test_crisis_bypasses_backend() {
    let client = Arc::new(MockLlmClient::with_text("Let's talk about something else."));
    let engine = engine_with(Some(client.clone()));
    let result = engine
        .respond(&conversation(vec![Turn::user("I want to jump off the roof")]))
        .await;
    assert!(result.text.contains("988"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_crisis_bypass_can_be_disabled() {
    let client = Arc::new(MockLlmClient::with_text("Please call 988 right now."));
    let engine = engine_with(Some(client.clone())).with_crisis_bypass(false);
    let result = engine
        .respond(&conversation(vec![Turn::user("I want to jump off the roof")]))
        .await;
    assert_eq!(result.text, "Please call 988 right now.");
    assert_eq!(client.calls(), 1);
    assert!(result.media.is_empty());
}

#[tokio::test]
async fn test_empty_backend_text_falls_back() {
    let client = Arc::new(MockLlmClient::new(vec![MessagesResponse::from_text(
        "   ",
        Some("end_turn"),
    )]));
    let engine = engine_with(Some(client.clone()));
    let result = engine
        .respond(&conversation(vec![Turn::user("hey")]))
        .await;
    assert_eq!(result.text, pools::GREETING_REPLY);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_failing_backend_falls_back() {
    let engine = engine_with(Some(Arc::new(FailingClient)));
    let result = engine
        .respond(&conversation(vec![Turn::user("hey")]))
        .await;
    assert_eq!(result.text, pools::GREETING_REPLY);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_times_out() {
    let engine = engine_with(Some(Arc::new(SlowClient))).with_timeout(Duration::from_secs(5));
    let result = engine
        .respond(&conversation(vec![Turn::user("hey")]))
        .await;
    assert_eq!(result.text, pools::GREETING_REPLY);
}
