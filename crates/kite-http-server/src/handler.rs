//! HTTP request handler: one JSON-RPC call per request.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use kite_json_rpc::{JsonRpcError, JsonRpcMessage, RpcDispatcher, RpcPayload, handle_payload};

use crate::{Result, ServerConfig};

/// Side-effecting callback invoked with (request payload, response, error)
/// whenever a call fails.
///
/// It runs after the response bytes are built, so it can observe but never
/// alter what the caller receives.
pub type ErrorHook = Arc<dyn Fn(&RpcPayload, &JsonRpcMessage, &JsonRpcError) + Send + Sync>;

/// HTTP handler binding a JSON-RPC dispatcher to hyper requests.
///
/// Holds no mutable state: each request is handled independently against the
/// shared dispatcher, and exactly one response is produced per request.
pub struct RpcHttpHandler {
    pub(crate) config: ServerConfig,
    pub(crate) dispatcher: Arc<dyn RpcDispatcher>,
    pub(crate) error_hook: Option<ErrorHook>,
}

impl RpcHttpHandler {
    /// Create a new handler
    pub fn new(config: ServerConfig, dispatcher: Arc<dyn RpcDispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            error_hook: None,
        }
    }

    /// Attach an error hook.
    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = Some(hook);
        self
    }

    /// Handle one HTTP request carrying a JSON-RPC call.
    ///
    /// Generic over the body type so tests can drive it with `Full<Bytes>`
    /// while the server feeds it `hyper::body::Incoming`.
    pub async fn handle_request<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>>
    where
        B: http_body::Body,
        B::Error: std::fmt::Display,
    {
        let body_bytes = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                warn!("Failed to read request body: {}", err);
                return Ok(Response::builder()
                    .status(StatusCode::BAD_REQUEST)
                    .body(Full::new(Bytes::from("Failed to read request body")))
                    .unwrap());
            }
        };

        if body_bytes.len() > self.config.max_body_size {
            warn!("Request body too large: {} bytes", body_bytes.len());
            return Ok(Response::builder()
                .status(StatusCode::PAYLOAD_TOO_LARGE)
                .body(Full::new(Bytes::from("Request body too large")))
                .unwrap());
        }

        let payload = match std::str::from_utf8(&body_bytes) {
            Ok(text) => {
                debug!("Received JSON-RPC request: {}", text);
                RpcPayload::Text(text.to_string())
            }
            Err(_) => {
                // Not representable as a string and not a parsed object, so
                // it takes the internal-error path through the envelope core.
                warn!("Request body is not UTF-8 text");
                RpcPayload::Json(Value::Null)
            }
        };

        self.respond(payload).await
    }

    /// Dispatch a payload and build the HTTP response around the outcome.
    ///
    /// Public so embedders whose framework already parsed the body can hand
    /// over an [`RpcPayload::Json`] directly. Always HTTP 200 with
    /// `application/json; charset=utf-8`; errors live in the body.
    pub async fn respond(&self, payload: RpcPayload) -> Result<Response<Full<Bytes>>> {
        let message = handle_payload(self.dispatcher.as_ref(), &payload).await;
        let body = serde_json::to_string(&message)?;

        debug!("Sending JSON-RPC response: {}", body);
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Full::new(Bytes::from(body)))
            .unwrap();

        // The response bytes are already fixed; the hook only observes.
        if let JsonRpcMessage::Error(failure) = &message {
            if let Some(hook) = &self.error_hook {
                (hook)(&payload, &message, &failure.error);
            }
        }

        Ok(response)
    }
}
