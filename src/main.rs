//! Contact Form Backend
//!
//! A small REST backend that accepts contact-form and feedback
//! submissions, persists them as JSON collections on disk, and exposes
//! paginated reads and aggregate statistics.

mod api;
mod config;
mod errors;
mod models;
mod ratelimit;
mod store;
mod validation;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use errors::AppError;
use ratelimit::RateLimiter;
use store::JsonStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Contact Form Backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let state = AppState {
        store: Arc::new(JsonStore::new(&config.data_dir)),
        config: Arc::new(config.clone()),
        started_at: Instant::now(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limiter = Arc::new(RateLimiter::new(
        state.config.rate_limit_max,
        state.config.rate_limit_window,
    ));

    // API routes
    let api_routes = Router::new()
        // Contact
        .route("/contact", post(api::submit_contact))
        .route("/contact", get(api::list_contacts))
        // Feedback
        .route("/feedback", post(api::submit_feedback))
        .route("/feedback/stats", get(api::get_feedback_stats))
        // Service
        .route("/status", get(api_status))
        .route("/docs", get(api_docs))
        // Apply per-IP rate limiting
        .layer(middleware::from_fn(move |req, next| {
            ratelimit::rate_limit_layer(limiter.clone(), req, next)
        }));

    Router::new()
        .nest("/api", api_routes)
        .fallback(endpoint_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service status reported by GET /api/status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    success: bool,
    status: &'static str,
    timestamp: String,
    uptime: f64,
    data_counts: BTreeMap<String, usize>,
}

/// GET /api/status - Service health plus per-collection item counts.
async fn api_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let data_counts = state.store.stats().await;
    let uptime = (state.started_at.elapsed().as_secs_f64() * 100.0).round() / 100.0;

    Json(StatusResponse {
        success: true,
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime,
        data_counts,
    })
}

/// GET /api/docs - Static capability description.
async fn api_docs() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "Contact Form API Documentation",
        "version": "1.0.0",
        "endpoints": {
            "POST /api/contact": {
                "description": "Submit contact form",
                "requiredFields": ["name", "email", "subject", "message"],
                "optionalFields": ["phone", "company"]
            },
            "GET /api/contact": {
                "description": "Get all contact submissions (admin)",
                "parameters": {
                    "page": "Page number (default: 1)",
                    "limit": "Items per page (default: 10)"
                }
            },
            "POST /api/feedback": {
                "description": "Submit feedback",
                "requiredFields": ["rating", "comment"],
                "optionalFields": ["email"]
            },
            "GET /api/feedback/stats": {
                "description": "Get feedback statistics"
            }
        }
    }))
}

/// Fallback for unknown routes.
async fn endpoint_not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

#[cfg(test)]
mod tests;
