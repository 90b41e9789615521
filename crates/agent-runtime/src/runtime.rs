//! Concrete host runtime
//!
//! The AgentRuntime owns shared resources (LLM provider, character, action
//! registry, cache) and routes incoming messages to registered actions.

use agent_core::{
    Action, ActionOutput, Character, Error, GenerationOptions, HandlerCallback, HandlerOptions,
    Memory, Result, Runtime, State,
};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::ActionRegistry;

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Model to use for text generation
    pub default_model: String,

    /// Default maximum tokens per generation
    pub max_tokens: usize,

    /// Default sampling temperature
    pub temperature: f32,

    /// Default frequency penalty
    pub frequency_penalty: Option<f32>,

    /// Default presence penalty
    pub presence_penalty: Option<f32>,

    /// Lifespan of runtime cache entries
    pub cache_ttl: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            frequency_penalty: None,
            presence_penalty: None,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Host runtime handed to actions
///
/// # Example
///
/// ```no_run
/// use agent_core::{Memory, State};
/// use agent_runtime::AgentRuntime;
/// # use std::sync::Arc;
///
/// # async fn example(provider: Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder().provider(provider).build()?;
/// let message = Memory::new("scheduler", "tick").with_action("GENERATE_TWEET");
/// let output = runtime.dispatch(&message, None).await?;
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    character: Character,
    actions: Arc<ActionRegistry>,
    config: RuntimeConfig,
    cache: RwLock<TimedCache<String, serde_json::Value>>,
}

impl AgentRuntime {
    /// Create a new agent runtime
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        character: Character,
        actions: Arc<ActionRegistry>,
        config: RuntimeConfig,
    ) -> Self {
        let cache = RwLock::new(TimedCache::with_lifespan(config.cache_ttl));
        Self {
            provider,
            character,
            actions,
            config,
            cache,
        }
    }

    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the LLM provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Get a reference to the action registry
    pub fn actions(&self) -> &Arc<ActionRegistry> {
        &self.actions
    }

    /// Get a reference to the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Register an action
    pub fn register_action(&self, action: Arc<dyn Action>) {
        info!("Registering action {}", action.name());
        self.actions.register(action);
    }

    /// Fresh state seeded from the character
    pub fn compose_state(&self) -> State {
        State::from_character(&self.character)
    }

    /// Route a message to an action and run it
    ///
    /// A message naming an action (`content.action`) goes to that action if
    /// it validates. Otherwise the first registered action whose `validate`
    /// passes handles it.
    #[instrument(skip(self, message, callback), fields(user = %message.user))]
    pub async fn dispatch(
        &self,
        message: &Memory,
        callback: Option<&dyn HandlerCallback>,
    ) -> Result<Option<ActionOutput>> {
        let mut state = self.compose_state();
        self.dispatch_with_state(message, &mut state, &serde_json::Value::Null, callback)
            .await
    }

    /// [`dispatch`](Self::dispatch) with caller-provided state and options
    pub async fn dispatch_with_state(
        &self,
        message: &Memory,
        state: &mut State,
        options: &HandlerOptions,
        callback: Option<&dyn HandlerCallback>,
    ) -> Result<Option<ActionOutput>> {
        let action = self.select_action(message, state).await?;
        debug!("Dispatching to {}", action.name());
        Ok(action.handle(self, message, state, options, callback).await)
    }

    async fn select_action(&self, message: &Memory, state: &State) -> Result<Arc<dyn Action>> {
        if let Some(requested) = message.content.action.as_deref() {
            let action = self
                .actions
                .get(requested)
                .ok_or_else(|| Error::ActionNotFound(requested.to_string()))?;
            if action.validate(self, message, state).await {
                return Ok(action);
            }
            warn!("Action {} rejected the message", action.name());
            return Err(Error::ActionNotFound(requested.to_string()));
        }

        for action in self.actions.list_actions() {
            if action.validate(self, message, state).await {
                return Ok(action);
            }
        }
        Err(Error::ActionNotFound(format!(
            "no action accepted message from {}",
            message.user
        )))
    }
}

#[async_trait]
impl Runtime for AgentRuntime {
    fn agent_name(&self) -> &str {
        &self.character.name
    }

    fn character(&self) -> &Character {
        &self.character
    }

    #[instrument(skip(self, prompt, options), fields(provider = %self.provider.name()))]
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let mut builder = CompletionRequest::builder(&self.config.default_model)
            .add_message(Message::user(prompt))
            .max_tokens(options.max_tokens.unwrap_or(self.config.max_tokens))
            .temperature(options.temperature.unwrap_or(self.config.temperature));

        if let Some(penalty) = options.frequency_penalty.or(self.config.frequency_penalty) {
            builder = builder.frequency_penalty(penalty);
        }
        if let Some(penalty) = options.presence_penalty.or(self.config.presence_penalty) {
            builder = builder.presence_penalty(penalty);
        }

        let response = self
            .provider
            .complete(builder.build())
            .await
            .map_err(|e| Error::ProcessingFailed(format!("LLM error: {e}")))?;

        debug!("Generated {} tokens", response.usage.output_tokens);
        Ok(response.text().trim().to_string())
    }

    async fn cache_get(&self, key: &str) -> Option<serde_json::Value> {
        let mut cache = self.cache.write().await;
        cache.cache_get(&key.to_string()).cloned()
    }

    async fn cache_set(&self, key: &str, value: serde_json::Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key.to_string(), value);
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    character: Character,
    actions: Option<Arc<ActionRegistry>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    /// Create a new runtime builder
    pub fn new() -> Self {
        Self {
            provider: None,
            character: Character::default(),
            actions: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the character
    pub fn character(mut self, character: Character) -> Self {
        self.character = character;
        self
    }

    /// Set the action registry
    pub fn actions(mut self, registry: Arc<ActionRegistry>) -> Self {
        self.actions = Some(registry);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    /// Set the default temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        let actions = self
            .actions
            .unwrap_or_else(|| Arc::new(ActionRegistry::new()));

        Ok(AgentRuntime::new(
            provider,
            self.character,
            actions,
            self.config,
        ))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::BufferedCallback;
    use agent_core::Content;
    use agent_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use std::sync::Mutex;

    /// Echoes the prompt back and records every request
    #[derive(Default)]
    struct RecordingProvider {
        requests: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            if self.fail {
                return Err(LLMError::RequestFailed("offline".into()));
            }
            let text = format!("  echo: {}  ", request.messages[0].content);
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                message: Message::assistant(text),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct KeywordAction {
        name: &'static str,
        keyword: &'static str,
    }

    #[async_trait]
    impl Action for KeywordAction {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "fires when the keyword is present"
        }

        async fn validate(&self, _: &dyn Runtime, message: &Memory, _: &State) -> bool {
            message.text().contains(self.keyword)
        }

        async fn handle(
            &self,
            runtime: &dyn Runtime,
            _: &Memory,
            state: &mut State,
            _: &HandlerOptions,
            callback: Option<&dyn HandlerCallback>,
        ) -> Option<ActionOutput> {
            if let Some(cb) = callback {
                cb.send(Content::with_action(runtime.agent_name(), self.name))
                    .await
                    .ok()?;
            }
            Some(ActionOutput::Tweet {
                content: format!("{} from {}", self.name, state.agent_name()?),
                data: None,
            })
        }
    }

    fn runtime_with(provider: RecordingProvider) -> AgentRuntime {
        let runtime = AgentRuntime::builder()
            .provider(Arc::new(provider))
            .character(Character::named("tester"))
            .default_model("test-model")
            .build()
            .unwrap();
        runtime.register_action(Arc::new(KeywordAction {
            name: "MARKET",
            keyword: "btc",
        }));
        runtime.register_action(Arc::new(KeywordAction {
            name: "NEWS",
            keyword: "news",
        }));
        runtime
    }

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert!(config.frequency_penalty.is_none());
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(
            AgentRuntime::builder().build(),
            Err(Error::InitializationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_dispatch_by_validation() {
        let runtime = runtime_with(RecordingProvider::default());
        let callback = BufferedCallback::new();

        let output = runtime
            .dispatch(&Memory::new("u", "any news today?"), Some(&callback))
            .await
            .unwrap();

        assert_eq!(
            output.unwrap().tweet_content(),
            Some("NEWS from tester")
        );
        assert_eq!(callback.take().await, vec![Content::with_action("tester", "NEWS")]);
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let runtime = runtime_with(RecordingProvider::default());
        let message = Memory::new("u", "btc and news").with_action("news");

        let output = runtime.dispatch(&message, None).await.unwrap();
        assert_eq!(output.unwrap().tweet_content(), Some("NEWS from tester"));
    }

    #[tokio::test]
    async fn test_dispatch_without_match() {
        let runtime = runtime_with(RecordingProvider::default());

        let by_text = runtime.dispatch(&Memory::new("u", "gm"), None).await;
        assert!(matches!(by_text, Err(Error::ActionNotFound(_))));

        let by_name = runtime
            .dispatch(&Memory::new("u", "gm").with_action("UNKNOWN"), None)
            .await;
        assert!(matches!(by_name, Err(Error::ActionNotFound(_))));
    }

    #[tokio::test]
    async fn test_generate_text_applies_options() {
        let provider = Arc::new(RecordingProvider::default());
        let runtime = AgentRuntime::new(
            provider.clone(),
            Character::default(),
            Arc::new(ActionRegistry::new()),
            RuntimeConfig {
                default_model: "m".into(),
                frequency_penalty: Some(0.1),
                ..RuntimeConfig::default()
            },
        );

        let options = GenerationOptions::default()
            .temperature(0.9)
            .max_tokens(100)
            .presence_penalty(0.4);
        let text = runtime.generate_text("gm", &options).await.unwrap();
        assert_eq!(text, "echo: gm");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].model, "m");
        assert_eq!(requests[0].max_tokens, 100);
        assert_eq!(requests[0].temperature, Some(0.9));
        assert_eq!(requests[0].frequency_penalty, Some(0.1));
        assert_eq!(requests[0].presence_penalty, Some(0.4));
    }

    #[tokio::test]
    async fn test_generate_text_error() {
        let runtime = runtime_with(RecordingProvider {
            fail: true,
            ..RecordingProvider::default()
        });
        let result = runtime
            .generate_text("gm", &GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(Error::ProcessingFailed(_))));
    }

    #[tokio::test]
    async fn test_cache_roundtrip() {
        let runtime = runtime_with(RecordingProvider::default());
        assert!(runtime.cache_get("previous_tweets").await.is_none());

        runtime
            .cache_set("previous_tweets", serde_json::json!(["gm"]))
            .await;
        assert_eq!(
            runtime.cache_get("previous_tweets").await,
            Some(serde_json::json!(["gm"]))
        );
    }
}
