//! # HTTP JSON-RPC Server
//!
//! HTTP binding for the `kite-json-rpc` dispatch core. One POST body in, one
//! JSON-RPC response out: every envelope-level outcome (success or error) is
//! returned as HTTP 200 with a JSON body, per JSON-RPC-over-HTTP convention.
//! Only transport-level problems (unreadable body, oversize body) surface as
//! non-200 status codes.
//!
//! ## Features
//! - [`RpcHttpHandler`]: the per-request handler, generic over the HTTP body
//!   type so it can be driven directly in tests
//! - Optional error hook invoked once per failed call, after the response
//!   bytes are fixed
//! - [`HttpRpcServer`]: a small hyper server for mounting the handler

pub mod handler;
pub mod server;

#[cfg(test)]
mod tests;

// Re-export main types
pub use handler::{ErrorHook, RpcHttpHandler};
pub use server::{HttpRpcServer, HttpRpcServerBuilder, ServerConfig};

// Re-export foundational types
pub use kite_json_rpc::{
    JsonRpcError, JsonRpcMessage, MethodRegistry, RpcDispatcher, RpcPayload,
};

/// Result type for HTTP RPC operations
pub type Result<T> = std::result::Result<T, HttpRpcError>;

/// HTTP RPC specific errors
#[derive(Debug, thiserror::Error)]
pub enum HttpRpcError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
