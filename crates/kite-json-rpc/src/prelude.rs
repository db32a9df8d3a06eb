//! # JSON-RPC Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use kite_json_rpc::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::error::{JsonRpcError, JsonRpcErrorCode};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcErrorResponse, JsonRpcMessage, JsonRpcResponse};
pub use crate::types::RequestId;

// Dispatch seam
pub use crate::dispatch::{
    MethodRegistry, RpcDispatcher, RpcMethod, RpcPayload, handle_payload, parse_call,
};

// Standard error codes
pub use crate::error_codes::*;
