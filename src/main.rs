use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizroom::{api, llm, state::AppState};

#[tokio::main]
async fn main() {
    // Pull in .env before anything reads the environment
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is fine; anything else is worth a warning
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: could not read .env: {}", e);
        }
    }
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizroom=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting quizroom...");

    let llm_config = llm::LlmConfig::from_env();
    let llm_manager = match llm_config.build_manager() {
        Ok(manager) => {
            let names: Vec<&str> = manager.providers.iter().map(|p| p.name()).collect();
            tracing::info!("LLM providers initialized: {}", names.join(", "));
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize LLM providers: {}. Question generation will not be available.",
                e
            );
            None
        }
    };

    let state = Arc::new(AppState::new_with_llm(llm_manager, llm_config));

    let app = Router::new()
        .merge(api::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
