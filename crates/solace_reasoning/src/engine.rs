use crate::api_types::{Message, Role as WireRole};
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts::compose_brief;
use crate::providers;
use crate::strategy::{self, Reply};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solace_core::analysis::TurnAnalysis;
use solace_core::config::SolaceConfig;
use solace_core::{analyze, Catalogue, Conversation, EngineError, EngineResult, Role, Turn};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_PERSONA: &str = "Solace";

/// Turns a conversation into one reply, optional media and a mood summary.
///
/// Holds no per-conversation state. The backend is optional: without one,
/// or whenever it fails, the locally selected reply is returned.
pub struct CompanionEngine {
    catalogue: Arc<Catalogue>,
    client: Option<Arc<dyn LlmClient>>,
    params: CompletionParams,
    timeout: Duration,
    persona: String,
    crisis_bypass: bool,
}

impl CompanionEngine {
    pub fn new(catalogue: Arc<Catalogue>, client: Option<Arc<dyn LlmClient>>) -> Self {
        Self {
            catalogue,
            client,
            params: CompletionParams::default(),
            timeout: DEFAULT_TIMEOUT,
            persona: DEFAULT_PERSONA.to_string(),
            crisis_bypass: true,
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// When set, at-risk turns get the fixed crisis text and the backend is skipped.
    pub fn with_crisis_bypass(mut self, bypass: bool) -> Self {
        self.crisis_bypass = bypass;
        self
    }

    /// Build an engine from config.
    ///
    /// A broken catalogue file is an error. A misconfigured backend is not:
    /// it is logged once and the engine runs on local replies only.
    pub fn from_config(config: &SolaceConfig) -> Result<Self> {
        let catalogue = match &config.engine.catalogue_path {
            Some(path) => Catalogue::load(path)?,
            None => Catalogue::builtin(),
        };
        let client = match providers::create_client(&config.llm) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Backend disabled, using local replies only: {:#}", e);
                None
            }
        };
        Ok(Self::new(Arc::new(catalogue), client)
            .with_params(CompletionParams::from(&config.llm))
            .with_timeout(Duration::from_secs(config.llm.timeout_secs))
            .with_persona(config.engine.persona_name.clone())
            .with_crisis_bypass(config.engine.crisis_bypasses_backend))
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn has_backend(&self) -> bool {
        self.client.is_some()
    }

    /// Validate raw turns and respond.
    pub async fn respond_to(&self, turns: Vec<Turn>) -> Result<EngineResult, EngineError> {
        let conversation = Conversation::new(turns)?;
        Ok(self.respond(&conversation).await)
    }

    pub async fn respond(&self, conversation: &Conversation) -> EngineResult {
        let mut rng = StdRng::from_entropy();
        self.respond_with_rng(conversation, &mut rng).await
    }

    /// Same as [`respond`](Self::respond) with a caller-supplied RNG, so a
    /// replay with the same seed picks the same local reply.
    pub async fn respond_with_rng<R: Rng + Send + ?Sized>(
        &self,
        conversation: &Conversation,
        rng: &mut R,
    ) -> EngineResult {
        let analysis = analyze(&self.catalogue, conversation);
        let local = strategy::select(conversation, &analysis, rng);

        tracing::info!(
            strategy = ?local.strategy,
            mood = %analysis.mood.dominant,
            media = analysis.media.items.len(),
            "Selected local reply"
        );

        let text = match &self.client {
            Some(_) if local.strategy.is_crisis() && self.crisis_bypass => {
                tracing::info!("Crisis turn, backend skipped");
                local.text
            }
            Some(client) => self.generate(client.as_ref(), conversation, &analysis, local).await,
            None => local.text,
        };

        EngineResult {
            text,
            media: analysis.media.items,
            mood: analysis.mood,
        }
    }

    async fn generate(
        &self,
        client: &dyn LlmClient,
        conversation: &Conversation,
        analysis: &TurnAnalysis<'_>,
        local: Reply,
    ) -> String {
        let brief = compose_brief(&self.persona, &analysis.matches, &analysis.mood);
        let messages = to_messages(conversation.turns());

        let outcome = tokio::time::timeout(
            self.timeout,
            client.complete(&brief, messages, self.params.clone()),
        )
        .await;

        let failure = match outcome {
            Ok(Ok(response)) => {
                let text = response.text();
                if !text.is_empty() {
                    return text;
                }
                EngineError::BackendUnavailable(format!("{} returned no text", client.name()))
            }
            Ok(Err(e)) => EngineError::BackendUnavailable(format!("{:#}", e)),
            Err(_) => EngineError::BackendUnavailable(format!(
                "{} timed out after {:?}",
                client.name(),
                self.timeout
            )),
        };
        tracing::warn!("{}, using local reply", failure);
        local.text
    }
}

/// Map turns onto the wire roles, skipping blank ones.
fn to_messages(turns: &[Turn]) -> Vec<Message> {
    turns
        .iter()
        .filter(|t| !t.text.trim().is_empty())
        .map(|t| {
            let role = match t.role {
                Role::User => WireRole::User,
                Role::Agent => WireRole::Assistant,
            };
            Message::text(role, &t.text)
        })
        .collect()
}
