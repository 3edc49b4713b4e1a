mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;

use std::net::SocketAddr;
use std::path::Path;

use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::forecast_routes::api_routes;
use crate::services::model_service::PowerModel;
use crate::shared_state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Load configuration
    let config = match Config::load("config.json") {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config.json: {}", e);
            return;
        }
    };

    // 2. Load the regression model — missing artifact halts startup
    let model = match PowerModel::load(Path::new(&config.model.path)) {
        Ok(m) => m,
        Err(e) => {
            error!(
                "Model not found or unreadable at {}: {}. Run `cargo run --bin train_model` first.",
                config.model.path, e
            );
            return;
        }
    };
    info!("Model loaded from {}", config.model.path);

    // 3. Shared state: the model plus the retained forecast session
    let state = AppState::new(model);
    let shared = SharedState {
        app: state,
        config: config.clone(),
    };

    // 4. HTTP server: JSON API, docs UI, static front-end
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route(
            "/scalar",
            get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }),
        )
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
