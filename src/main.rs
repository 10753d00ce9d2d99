//! Property Concierge HTTP server.

use std::sync::Arc;

use property_concierge::adapters::{
    api_router, AssistantAppState, ChatCompletionClient, ChatCompletionConfig,
    JsonDirectorySource, LlmIntentClassifier, LlmResultExplainer, TemplateExplainer,
};
use property_concierge::application::{AssistantTurnHandler, ResultLimits};
use property_concierge::config::{AppConfig, CollaboratorsConfig, ExplainerKind, ServerConfig};
use property_concierge::domain::search::{ListingRepository, MatchEngine};
use property_concierge::ports::CollaboratorError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        sources_dir = %config.listings.sources_dir.display(),
        "Starting Property Concierge"
    );

    // Listings
    let source = Arc::new(JsonDirectorySource::new(&config.listings.sources_dir));
    let repository = Arc::new(ListingRepository::new(source));
    repository.reload().await;

    if let Some(period) = config.listings.refresh_interval() {
        let repository = repository.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                repository.reload().await;
            }
        });
        tracing::info!(interval_secs = period.as_secs(), "periodic listing refresh enabled");
    }

    // Assistant
    let engine = MatchEngine::new(repository.clone(), config.pricing.exchange_rate()?);
    let turn_handler = build_turn_handler(engine, &config)?;
    let state = AssistantAppState::new(Arc::new(turn_handler), repository);

    let app = api_router(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    if server.json_logs() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_turn_handler(
    engine: MatchEngine,
    config: &AppConfig,
) -> Result<AssistantTurnHandler, CollaboratorError> {
    let collaborators = &config.collaborators;
    let mut handler = AssistantTurnHandler::new(engine)
        .with_collaborator_timeout(collaborators.timeout())
        .with_limits(ResultLimits {
            default: config.listings.default_limit,
            max: config.listings.max_limit,
        });

    if collaborators.classifier_enabled {
        let client = chat_client(collaborators)?;
        tracing::info!(model = client.model(), "intent classifier enabled");
        handler = handler.with_classifier(Arc::new(LlmIntentClassifier::new(client)));
    }

    match collaborators.explainer {
        ExplainerKind::Template => {
            handler = handler.with_explainer(Arc::new(TemplateExplainer::new()));
        }
        ExplainerKind::Llm => {
            let client = chat_client(collaborators)?;
            handler = handler.with_explainer(Arc::new(LlmResultExplainer::new(client)));
        }
        ExplainerKind::None => {}
    }

    Ok(handler)
}

fn chat_client(config: &CollaboratorsConfig) -> Result<ChatCompletionClient, CollaboratorError> {
    let api_key = config
        .api_key()
        .ok_or_else(|| CollaboratorError::Unavailable("no API key configured".to_string()))?;
    ChatCompletionClient::new(
        ChatCompletionConfig::new(api_key)
            .with_model(&config.model)
            .with_base_url(&config.base_url)
            .with_timeout(config.timeout()),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
