//! Wiring of the resolver, the data aggregator and the prompt builder into a
//! single question/answer call.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use seachat_core::config::Config;
use seachat_core::types::{Message, SourceResult};
use seachat_data::{Aggregator, Classification, ContextBuilder, HttpOceanClient};
use seachat_providers::{HttpProvider, LlmProvider, LlmRequestConfig, ProviderResolver};

/// Earlier messages kept in the REPL conversation.
const MAX_HISTORY_MESSAGES: usize = 10;

/// Result of one `ask`.
pub struct Answer {
    pub classification: Classification,
    pub data: SourceResult,
    /// `None` in data-only mode.
    pub reply: Option<Reply>,
}

pub struct Reply {
    pub text: String,
    pub model_display_name: String,
    pub used_fallback: bool,
}

/// The model side of the app; absent in data-only mode.
struct ModelStack {
    provider: Arc<dyn LlmProvider>,
    resolver: ProviderResolver,
    request: LlmRequestConfig,
}

pub struct App {
    aggregator: Aggregator,
    context: ContextBuilder,
    model: Option<ModelStack>,
    history: Vec<Message>,
}

impl App {
    /// Build the data side only. Needs no API key.
    pub fn data_only(config: &Config) -> Self {
        let client = Arc::new(HttpOceanClient::new(&config.sources));
        Self {
            aggregator: Aggregator::new(client, &config.sources),
            context: ContextBuilder::default(),
            model: None,
            history: Vec::new(),
        }
    }

    /// Build the full stack. Fails when the AI section is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut app = Self::data_only(config);
        let (resolver, provider) = build_resolver(config)?;
        app.model = Some(ModelStack {
            provider,
            resolver,
            request: LlmRequestConfig {
                max_tokens: config.ai.max_tokens,
                temperature: config.ai.temperature,
            },
        });
        Ok(app)
    }

    /// Gather data for `query` and, when a model is wired in, answer it.
    ///
    /// Answered turns are remembered and sent with later questions.
    pub async fn ask(&mut self, query: &str) -> Result<Answer> {
        let classification = self.aggregator.classifier().classify(query);
        let data = self.aggregator.aggregate_classified(&classification).await;
        debug!(keys = ?data.keys().collect::<Vec<_>>(), "data gathered");

        let Some(model) = &self.model else {
            return Ok(Answer {
                classification,
                data,
                reply: None,
            });
        };

        let messages = self
            .context
            .build_messages(&self.history, query, &classification, &data);
        let generation = model
            .resolver
            .generate(model.provider.as_ref(), &messages, &model.request)
            .await
            .context("model request failed")?;
        info!(
            model = %generation.candidate.name,
            fallback = generation.used_fallback,
            "answer generated"
        );

        self.remember(query, &generation.text);

        Ok(Answer {
            classification,
            data,
            reply: Some(Reply {
                text: generation.text,
                model_display_name: generation.candidate.display_name,
                used_fallback: generation.used_fallback,
            }),
        })
    }

    fn remember(&mut self, query: &str, reply: &str) {
        self.history.push(Message::user(query));
        self.history.push(Message::assistant(reply));
        if self.history.len() > MAX_HISTORY_MESSAGES {
            let excess = self.history.len() - MAX_HISTORY_MESSAGES;
            self.history.drain(..excess);
        }
    }
}

/// Build the HTTP provider and a resolver probing through it.
pub fn build_resolver(config: &Config) -> Result<(ProviderResolver, Arc<dyn LlmProvider>)> {
    let provider = HttpProvider::new(&config.ai)
        .context("failed to create AI provider")?;
    let provider: Arc<dyn LlmProvider> = Arc::new(provider);
    let resolver = ProviderResolver::from_config(&config.ai, provider.clone())
        .context("invalid AI configuration (run `seachat init`, then set ai.apiKey)")?;
    Ok((resolver, provider))
}
