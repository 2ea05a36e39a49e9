//! HTTP server exposing the WhatsApp webhook.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use tracing::{error, info};

use crate::config::ParleyConfig;
use crate::error::{ParleyError, Result};
use crate::relay::Relay;
use crate::whatsapp::{twiml, TwilioWhatsApp};

pub const WEBHOOK_PATH: &str = "/whatsapp";

const SIGNATURE_HEADER: &str = "x-twilio-signature";

type SharedChannel = Arc<TwilioWhatsApp>;

/// Build the router: `POST /whatsapp` and `GET /health`.
pub fn build_router(channel: TwilioWhatsApp) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(whatsapp_webhook))
        .route("/health", get(health))
        .with_state(Arc::new(channel))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// The URL Twilio signed, rebuilt from proxy headers and the request URI.
pub fn public_url(headers: &HeaderMap, uri: &Uri) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
    };
    let proto = header("x-forwarded-proto").unwrap_or_else(|| "https".to_string());
    let host = header("x-forwarded-host")
        .or_else(|| header(HOST.as_str()))
        .unwrap_or_default();
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(WEBHOOK_PATH);
    format!("{proto}://{host}{path}")
}

fn xml(status: StatusCode, body: String) -> Response {
    (status, [(CONTENT_TYPE, "application/xml")], body).into_response()
}

async fn whatsapp_webhook(
    State(channel): State<SharedChannel>,
    headers: HeaderMap,
    uri: Uri,
    Form(params): Form<BTreeMap<String, String>>,
) -> Response {
    let url = public_url(&headers, &uri);
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    match channel.handle(&url, signature, &params).await {
        Ok(body) => xml(StatusCode::OK, body),
        Err(ParleyError::InvalidSignature) => {
            xml(StatusCode::UNAUTHORIZED, twiml::empty_response())
        }
        Err(e @ ParleyError::InvalidArgument(_)) => {
            error!(error = %e, "Bad webhook request");
            xml(StatusCode::BAD_REQUEST, twiml::empty_response())
        }
        Err(e) => {
            error!(error = %e, category = ?e.category(), "Failed to handle WhatsApp message");
            xml(StatusCode::INTERNAL_SERVER_ERROR, twiml::empty_response())
        }
    }
}

/// Run the webhook server until Ctrl-C.
pub async fn serve(config: &ParleyConfig) -> Result<()> {
    let relay = Relay::new(config)?;
    let channel = TwilioWhatsApp::new(relay, config)?;
    let router = build_router(channel);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        langgraph_url = %config.langgraph_url,
        assistant_id = %config.assistant_id,
        "WhatsApp webhook listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
