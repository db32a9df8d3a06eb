//! Envelope extraction and method dispatch.
//!
//! [`parse_call`] turns a raw transport payload into a validated
//! [`JsonRpcRequest`]; [`handle_payload`] runs the full parse → dispatch →
//! respond sequence against an [`RpcDispatcher`]. Both are transport
//! agnostic: the HTTP binding and any future transport share this path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::{Value, json};

use crate::error::JsonRpcError;
use crate::request::{JsonRpcRequest, RequestParams};
use crate::response::{JsonRpcErrorResponse, JsonRpcMessage};
use crate::types::RequestId;

/// An incoming request body as delivered by the transport.
///
/// A transport that parses bodies itself (the way body-parsing middleware
/// does) hands over `Json`; one that forwards the raw body hands over `Text`
/// and parsing happens here.
#[derive(Debug, Clone)]
pub enum RpcPayload {
    /// Raw body, to be parsed as JSON.
    Text(String),
    /// Body already parsed by an external collaborator.
    Json(Value),
}

impl From<&str> for RpcPayload {
    fn from(raw: &str) -> Self {
        RpcPayload::Text(raw.to_string())
    }
}

impl From<String> for RpcPayload {
    fn from(raw: String) -> Self {
        RpcPayload::Text(raw)
    }
}

impl From<Value> for RpcPayload {
    fn from(value: Value) -> Self {
        RpcPayload::Json(value)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract and validate a call envelope from a payload.
///
/// Local failures terminate the call with an error response:
/// - `Text` that is not valid JSON → `-32700` with no id;
/// - a pre-parsed `Json` payload that is a scalar (null, bool, number,
///   string) → `-32603` with no id;
/// - missing or empty `method`, or non-object `params` → `-32600`, with the
///   request's id preserved. A pre-parsed array carries no envelope fields
///   and falls out here too.
///
/// The id is extracted before any validation so every locally produced error
/// response carries it. `method` must be a non-empty JSON string; truthiness
/// shortcuts are deliberately not used.
pub fn parse_call(payload: &RpcPayload) -> Result<JsonRpcRequest, JsonRpcErrorResponse> {
    let envelope: Value = match payload {
        RpcPayload::Text(raw) => match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                return Err(JsonRpcErrorResponse::new(None, JsonRpcError::parse_error()));
            }
        },
        // Arrays pass the structural check like objects do; they simply
        // carry no envelope fields and fall out as Invalid Request below.
        RpcPayload::Json(value @ (Value::Object(_) | Value::Array(_))) => value.clone(),
        RpcPayload::Json(_) => {
            return Err(JsonRpcErrorResponse::new(
                None,
                JsonRpcError::internal_error(Some(
                    "request body must be a JSON object or string".to_string(),
                )),
            ));
        }
    };

    // `envelope.get` on a non-object yields None across the board, so text
    // bodies that parse to a scalar fall out below as Invalid Request.
    let id = envelope.get("id").cloned().map(RequestId::new);

    let method = match envelope.get("method") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => {
            return Err(JsonRpcErrorResponse::new(
                id,
                JsonRpcError::invalid_request(None),
            ));
        }
    };

    let params = match envelope.get("params") {
        None | Some(Value::Null) => RequestParams::default(),
        Some(Value::Object(map)) => RequestParams::from(map.clone()),
        Some(other) => {
            return Err(JsonRpcErrorResponse::new(
                id,
                JsonRpcError::invalid_request(Some(json!(format!(
                    "params must be an object, got {}",
                    json_type_name(other)
                )))),
            ));
        }
    };

    Ok(JsonRpcRequest {
        method,
        params,
        id,
    })
}

/// The seam to business logic.
///
/// Method registration, argument validation and everything behind the method
/// name live on the other side of this trait. Errors it raises appear in the
/// response verbatim.
#[async_trait]
pub trait RpcDispatcher: Send + Sync {
    async fn dispatch_call(
        &self,
        method: &str,
        params: RequestParams,
    ) -> Result<Value, JsonRpcError>;
}

/// Run one call end to end: parse the payload, dispatch, build the response.
///
/// Exactly one message is produced per payload. The dispatch future is
/// awaited without any in-scope timeout; a dispatcher that never resolves
/// hangs this call.
pub async fn handle_payload(dispatcher: &dyn RpcDispatcher, payload: &RpcPayload) -> JsonRpcMessage {
    let request = match parse_call(payload) {
        Ok(request) => request,
        Err(failure) => return JsonRpcMessage::Error(failure),
    };

    let id = request.id.clone();
    match dispatcher.dispatch_call(&request.method, request.params).await {
        Ok(result) => JsonRpcMessage::success(id, result),
        Err(error) => JsonRpcMessage::failure(id, error),
    }
}

/// A single callable method.
#[async_trait]
pub trait RpcMethod: Send + Sync {
    async fn call(&self, params: RequestParams) -> Result<Value, JsonRpcError>;
}

/// Closure adapter for [`RpcMethod`].
pub struct FunctionMethod<F>
where
    F: Fn(RequestParams) -> BoxFuture<'static, Result<Value, JsonRpcError>> + Send + Sync,
{
    method_fn: F,
}

impl<F> FunctionMethod<F>
where
    F: Fn(RequestParams) -> BoxFuture<'static, Result<Value, JsonRpcError>> + Send + Sync,
{
    pub fn new(method_fn: F) -> Self {
        Self { method_fn }
    }
}

#[async_trait]
impl<F> RpcMethod for FunctionMethod<F>
where
    F: Fn(RequestParams) -> BoxFuture<'static, Result<Value, JsonRpcError>> + Send + Sync,
{
    async fn call(&self, params: RequestParams) -> Result<Value, JsonRpcError> {
        (self.method_fn)(params).await
    }
}

/// Name-to-method registry implementing [`RpcDispatcher`].
///
/// Unknown methods resolve to `-32601`. This is a convenience; the HTTP
/// binding works against any [`RpcDispatcher`].
#[derive(Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Arc<dyn RpcMethod>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register a method under a name, replacing any previous registration.
    pub fn register<M>(&mut self, name: impl Into<String>, method: M)
    where
        M: RpcMethod + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
    }

    /// Register a closure as a method.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, method_fn: F)
    where
        F: Fn(RequestParams) -> BoxFuture<'static, Result<Value, JsonRpcError>>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, FunctionMethod::new(method_fn));
    }

    /// Get all registered method names
    pub fn registered_methods(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }
}

#[async_trait]
impl RpcDispatcher for MethodRegistry {
    async fn dispatch_call(
        &self,
        method: &str,
        params: RequestParams,
    ) -> Result<Value, JsonRpcError> {
        match self.methods.get(method) {
            Some(handler) => handler.call(params).await,
            None => Err(JsonRpcError::method_not_found(method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn adder() -> MethodRegistry {
        let mut registry = MethodRegistry::new();
        registry.register_fn("add", |params| {
            async move {
                let a = params
                    .get("a")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| JsonRpcError::invalid_params("'a' must be a number"))?;
                let b = params
                    .get("b")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| JsonRpcError::invalid_params("'b' must be a number"))?;
                Ok(json!(a + b))
            }
            .boxed()
        });
        registry
    }

    #[test]
    fn test_parse_valid_text_payload() {
        let payload = RpcPayload::from(r#"{"method":"add","params":{"a":1,"b":2},"id":"x1"}"#);
        let request = parse_call(&payload).unwrap();

        assert_eq!(request.method, "add");
        assert_eq!(request.id, Some(RequestId::from("x1")));
        assert_eq!(request.get_param("a"), Some(&json!(1)));
    }

    #[test]
    fn test_parse_preparsed_payload() {
        let payload = RpcPayload::from(json!({"method": "status", "id": 9}));
        let request = parse_call(&payload).unwrap();

        assert_eq!(request.method, "status");
        assert!(request.params.is_empty());
    }

    #[test]
    fn test_malformed_text_is_parse_error() {
        let failure = parse_call(&RpcPayload::from("{bad")).unwrap_err();
        assert_eq!(failure.error.code, -32700);
        assert_eq!(failure.id, None);
    }

    #[test]
    fn test_preparsed_non_object_is_internal_error() {
        let failure = parse_call(&RpcPayload::from(json!(42))).unwrap_err();
        assert_eq!(failure.error.code, -32603);
        assert_eq!(failure.id, None);
    }

    #[test]
    fn test_preparsed_array_is_invalid_request() {
        // an array passes the structural check but has no envelope fields
        let failure = parse_call(&RpcPayload::from(json!([1, 2, 3]))).unwrap_err();
        assert_eq!(failure.error.code, -32600);
        assert_eq!(failure.id, None);
    }

    #[test]
    fn test_text_scalar_is_invalid_request() {
        // "5" parses fine but carries no envelope fields
        let failure = parse_call(&RpcPayload::from("5")).unwrap_err();
        assert_eq!(failure.error.code, -32600);
        assert_eq!(failure.id, None);
    }

    #[test]
    fn test_missing_method_preserves_id() {
        let failure = parse_call(&RpcPayload::from(r#"{"params":{},"id":1}"#)).unwrap_err();
        assert_eq!(failure.error.code, -32600);
        assert_eq!(failure.id, Some(RequestId::from(1)));
    }

    #[test]
    fn test_empty_method_is_invalid_request() {
        let failure = parse_call(&RpcPayload::from(r#"{"method":"","id":2}"#)).unwrap_err();
        assert_eq!(failure.error.code, -32600);
        assert_eq!(failure.id, Some(RequestId::from(2)));
    }

    #[test]
    fn test_array_params_rejected() {
        let failure = parse_call(&RpcPayload::from(r#"{"method":"add","params":[1,2],"id":3}"#))
            .unwrap_err();
        assert_eq!(failure.error.code, -32600);
        assert_eq!(failure.id, Some(RequestId::from(3)));
    }

    #[tokio::test]
    async fn test_handle_payload_success() {
        let registry = adder();
        let payload = RpcPayload::from(r#"{"method":"add","params":{"a":1,"b":2},"id":"x1"}"#);

        let message = handle_payload(&registry, &payload).await;
        assert_eq!(message.to_json().unwrap(), r#"{"id":"x1","result":3.0}"#);
    }

    #[tokio::test]
    async fn test_handle_payload_method_not_found() {
        let registry = adder();
        let payload = RpcPayload::from(r#"{"method":"multiply","id":7}"#);

        let message = handle_payload(&registry, &payload).await;
        assert!(message.is_error());
        assert_eq!(message.error().unwrap().code, -32601);
        assert!(message.error().unwrap().message.contains("multiply"));
        assert_eq!(message.id(), Some(&RequestId::from(7)));
    }

    #[tokio::test]
    async fn test_handle_payload_dispatcher_error_passthrough() {
        struct Failing;

        #[async_trait]
        impl RpcDispatcher for Failing {
            async fn dispatch_call(
                &self,
                _method: &str,
                _params: RequestParams,
            ) -> Result<Value, JsonRpcError> {
                Err(JsonRpcError::application(
                    1001,
                    "quota exceeded",
                    Some(json!({"limit": 10})),
                ))
            }
        }

        let payload = RpcPayload::from(r#"{"method":"anything","id":4}"#);
        let message = handle_payload(&Failing, &payload).await;

        let error = message.error().unwrap();
        assert_eq!(error.code, 1001);
        assert_eq!(error.message, "quota exceeded");
        assert_eq!(error.data, Some(json!({"limit": 10})));
    }

    #[tokio::test]
    async fn test_omitted_params_reach_dispatcher_as_empty_map() {
        use std::sync::Mutex;

        struct Recording(Mutex<Option<RequestParams>>);

        #[async_trait]
        impl RpcDispatcher for Recording {
            async fn dispatch_call(
                &self,
                _method: &str,
                params: RequestParams,
            ) -> Result<Value, JsonRpcError> {
                *self.0.lock().unwrap() = Some(params);
                Ok(Value::Null)
            }
        }

        let dispatcher = Recording(Mutex::new(None));
        handle_payload(&dispatcher, &RpcPayload::from(r#"{"method":"ping","id":1}"#)).await;

        let seen = dispatcher.0.lock().unwrap().take().unwrap();
        assert!(seen.is_empty());
    }

    #[test]
    fn test_registry_registered_methods() {
        let registry = adder();
        assert_eq!(registry.registered_methods(), vec!["add".to_string()]);
    }
}
