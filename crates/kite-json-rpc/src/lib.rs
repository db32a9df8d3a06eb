//! # JSON-RPC Envelope Handling and Dispatch
//!
//! A small, transport-agnostic JSON-RPC 2.0-style core: call envelope types,
//! the reserved error taxonomy, and the parse → dispatch → respond sequence.
//! Transports (see `kite-http-server` for the HTTP binding) stay thin: they
//! deliver an [`RpcPayload`] and serialize the resulting [`JsonRpcMessage`].
//!
//! ## Features
//! - Opaque correlation ids, copied verbatim from request to response
//! - Explicit envelope validation (non-empty `method`, object `params`)
//! - Dispatcher errors passed through to the caller unmodified
//! - Async dispatch seam via [`RpcDispatcher`], plus a [`MethodRegistry`]
//!   convenience implementation
//!
//! Batching and notification semantics are deliberately out of scope: one
//! payload in, exactly one response out.

pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

// Re-export main types
pub use dispatch::{
    FunctionMethod, MethodRegistry, RpcDispatcher, RpcMethod, RpcPayload, handle_payload,
    parse_call,
};
pub use error::{JsonRpcError, JsonRpcErrorCode};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcErrorResponse, JsonRpcMessage, JsonRpcResponse};
pub use transport::{RpcTransport, TransportError};
pub use types::RequestId;

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
