use library_lending::{
    adapters::SystemClock,
    api::{handlers::AppState, router::create_router},
    application::{Library, ServiceDependencies},
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(?config, "Configuration loaded");

    // Initialize adapters
    let service_deps = ServiceDependencies::in_memory(Arc::new(SystemClock));
    let library = Library::new(service_deps);

    if config.seed_demo_data {
        library.seed_demo_data().await;
    }

    // Create application state
    let app_state = Arc::new(AppState { library });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
