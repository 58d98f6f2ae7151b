use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use method_workflow::adapters::http::{api_router, with_transport_layers, AuthState, DocumentsAppState};
use method_workflow::adapters::{
    InMemoryDocumentStore, RoleBasedAuthorizationChecker, StaticTokenValidator,
    TracingEventPublisher,
};
use method_workflow::application::{RevisionManager, WorkflowEngine};
use method_workflow::config::{AppConfig, LogFormat, LoggingConfig};
use method_workflow::ports::{AuthorizationChecker, DocumentStore, EventPublisher};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(logging: &LoggingConfig) -> Result<(), BoxError> {
    let registry = tracing_subscriber::registry().with(logging.env_filter()?);
    match logging.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let checker: Arc<dyn AuthorizationChecker> =
        Arc::new(RoleBasedAuthorizationChecker::from_config(&config));
    let publisher: Arc<dyn EventPublisher> = Arc::new(TracingEventPublisher::new());
    let validator: AuthState = Arc::new(StaticTokenValidator::from_config(&config.auth)?);

    let engine = Arc::new(WorkflowEngine::new(
        store.clone(),
        checker,
        publisher.clone(),
        config.workflow.clone(),
    ));
    let revisions = Arc::new(RevisionManager::new(
        engine.clone(),
        store,
        publisher,
        config.workflow.clone(),
    ));

    let app = with_transport_layers(
        api_router(DocumentsAppState::new(engine, revisions), validator),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        actors = config.auth.tokens.len(),
        "starting method-workflow server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
