//! Abstract client-side transport.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::JsonRpcError;
use crate::request::RequestParams;

/// Errors a transport can surface while originating a call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON-RPC level failure returned by the remote side, verbatim.
    #[error(transparent)]
    Rpc(#[from] JsonRpcError),
}

/// Capability a pluggable transport must implement to originate calls.
///
/// This is an extension point only: no implementation ships with this crate.
/// An implementor is expected to serialize the call envelope, deliver it to
/// a remote dispatcher and hand back the `result` member, mapping an `error`
/// member onto [`TransportError::Rpc`].
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn perform_call(
        &self,
        method: &str,
        params: Option<RequestParams>,
    ) -> Result<Value, TransportError>;
}
