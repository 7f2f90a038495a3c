//! HTTP surface of the question tagger: `POST /tag`, `GET /questions`, `GET /health`.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use ai_llm_service::{OpenAiService, config_openai_tagging};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use question_tagger::{
    StoreConfig, Tagger, completion::openai::OpenAiCompletion, store::mongo::MongoStore,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, error, info};

use crate::{
    core::app_state::{ApiConfig, AppState},
    error_handler::AppError,
    middleware_layer::debug_token::require_debug_token,
    routes::{
        health_route::health, questions::questions_route::list_questions,
        tag::tag_route::tag_question,
    },
};

/// Max accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the collaborators from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let config = ApiConfig::from_env()?;

    let llm_cfg = config_openai_tagging()?;
    info!(model = %llm_cfg.model, endpoint = %llm_cfg.endpoint, "completion client configured");
    let completion = OpenAiCompletion::new(OpenAiService::new(llm_cfg)?)?;

    let store_cfg = StoreConfig::from_env();
    let store = MongoStore::connect(&store_cfg).await?;
    info!(
        database = %store_cfg.database,
        collection = %store_cfg.collection,
        "document store configured"
    );

    let address = config.address.clone();
    let state = Arc::new(AppState {
        tagger: Tagger::new(Arc::new(completion), Arc::new(store)),
        config,
    });
    let app = build_router(state);

    let listener = TcpListener::bind(&address).await.map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Routes, per-route guards and the shared layers.
///
/// `/questions` is only mounted when enabled and sits behind the debug token
/// check.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/tag", post(tag_question))
        .route("/health", get(health));

    if state.config.questions_enabled {
        let questions = Router::new()
            .route("/questions", get(list_questions))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                require_debug_token,
            ));
        app = app.merge(questions);
    }

    app.fallback(not_found)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
