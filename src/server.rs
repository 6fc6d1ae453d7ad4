//! Kredits Bot Server
//!
//! HTTP server receiving GitHub webhook deliveries.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::event::WebhookEvent;
use crate::workflow::{EventOutcome, KreditsWorkflow};

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

pub struct AppState {
    pub workflow: Arc<KreditsWorkflow>,
    pub started_at: std::time::Instant,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "healthy": true,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let delivery = header(&headers, DELIVERY_HEADER)
        .map(String::from)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let Some(event_name) = header(&headers, EVENT_HEADER) else {
        warn!("Delivery {} has no event header", delivery);
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "delivery": delivery, "error": "missing X-GitHub-Event header" })),
        );
    };

    let event = match WebhookEvent::from_delivery(event_name, &body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Delivery {} ({}) rejected: {}", delivery, event_name, e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "delivery": delivery, "error": e.to_string() })),
            );
        }
    };

    let name = event.name();
    if let WebhookEvent::Other { .. } = event {
        return (
            StatusCode::OK,
            Json(json!({ "delivery": delivery, "event": name, "status": "ignored" })),
        );
    }

    info!("Delivery {}: {}", delivery, name);

    let workflow = state.workflow.clone();
    let spawned_delivery = delivery.clone();
    tokio::spawn(async move {
        match workflow.handle_event(event).await {
            EventOutcome::Processed { amount, assignees } => {
                let succeeded = assignees.iter().filter(|a| a.is_success()).count();
                info!(
                    "Delivery {} done: {}/{} proposals created ({} kredits each)",
                    spawned_delivery,
                    succeeded,
                    assignees.len(),
                    amount
                );
            }
            EventOutcome::Ignored { reason } => {
                info!("Delivery {} ignored: {}", spawned_delivery, reason);
            }
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({ "delivery": delivery, "event": name, "status": "accepted" })),
    )
}

/// Run the server
pub async fn run_server(host: &str, port: u16, workflow: Arc<KreditsWorkflow>) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        workflow,
        started_at: std::time::Instant::now(),
    });

    let app = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!("Starting Kredits Bot server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
