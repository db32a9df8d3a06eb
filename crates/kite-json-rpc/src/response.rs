use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::RequestId;

/// A successful JSON-RPC response: `{ id?, result }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: Option<RequestId>, result: Value) -> Self {
        Self { id, result }
    }

    pub fn success(id: RequestId, result: Value) -> Self {
        Self::new(Some(id), result)
    }
}

/// A failed JSON-RPC response: `{ id?, error }`.
///
/// The id mirrors the originating request; it is absent only when the
/// incoming body could not be parsed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self { id, error }
    }
}

/// Union type that represents either a successful response or an error
/// response. Keeping the two forms separate guarantees a response never
/// carries both `result` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcErrorResponse),
}

impl JsonRpcMessage {
    /// Create a success message
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    /// Create an error message
    pub fn failure(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self::Error(JsonRpcErrorResponse::new(id, error))
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// Get the request ID from either response or error
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(resp) => resp.id.as_ref(),
            JsonRpcMessage::Error(err) => err.id.as_ref(),
        }
    }

    /// Get the error object if this is an error response
    pub fn error(&self) -> Option<&JsonRpcError> {
        match self {
            JsonRpcMessage::Error(err) => Some(&err.error),
            JsonRpcMessage::Response(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcErrorResponse> for JsonRpcMessage {
    fn from(error: JsonRpcErrorResponse) -> Self {
        Self::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_response_serialization() {
        let response = JsonRpcResponse::success(RequestId::from("x1"), json!(3));

        let json_str = to_string(&response).unwrap();
        assert_eq!(json_str, r#"{"id":"x1","result":3}"#);
    }

    #[test]
    fn test_absent_id_omitted() {
        let failure = JsonRpcErrorResponse::new(None, JsonRpcError::parse_error());
        let json_str = to_string(&failure).unwrap();
        assert!(!json_str.contains("\"id\""));
        assert!(json_str.contains("-32700"));
    }

    #[test]
    fn test_message_union_deserialization() {
        let success: JsonRpcMessage = from_str(r#"{"id":1,"result":{"ok":true}}"#).unwrap();
        assert!(!success.is_error());
        assert_eq!(success.id(), Some(&RequestId::from(1)));

        let failure: JsonRpcMessage =
            from_str(r#"{"id":1,"error":{"code":-32601,"message":"Method not found"}}"#).unwrap();
        assert!(failure.is_error());
        assert_eq!(failure.error().unwrap().code, -32601);
    }

    #[test]
    fn test_null_result_is_still_success() {
        let message: JsonRpcMessage = from_str(r#"{"id":2,"result":null}"#).unwrap();
        assert!(!message.is_error());
        assert_eq!(message.id(), Some(&RequestId::from(2)));
    }
}
