//! Server configuration and builder tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{Value, json};

use kite_json_rpc::{JsonRpcError, RequestParams, RpcDispatcher};

use crate::server::{HttpRpcServer, HttpRpcServerBuilder, ServerConfig};

#[test]
fn test_server_config_default() {
    let config = ServerConfig::default();
    assert_eq!(config.rpc_path, "/rpc");
    assert_eq!(config.max_body_size, 1024 * 1024);
    assert_eq!(config.bind_address.port(), 8000);
}

#[test]
fn test_builder_customization() {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 3000);
    let server = HttpRpcServer::builder()
        .bind_address(addr)
        .rpc_path("/api/rpc")
        .max_body_size(2048)
        .build();

    assert_eq!(server.config.bind_address, addr);
    assert_eq!(server.config.rpc_path, "/api/rpc");
    assert_eq!(server.config.max_body_size, 2048);
}

#[tokio::test]
async fn test_builder_registry_methods_are_dispatched() {
    let server = HttpRpcServerBuilder::new()
        .register_fn("echo", |params| {
            async move { Ok(params.to_value()) }.boxed()
        })
        .build();

    let response = server
        .handler
        .respond(kite_json_rpc::RpcPayload::from(
            r#"{"method":"echo","params":{"x":1},"id":1}"#,
        ))
        .await
        .unwrap();

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["result"], json!({"x": 1}));
}

#[tokio::test]
async fn test_builder_external_dispatcher_wins() {
    struct Fixed;

    #[async_trait]
    impl RpcDispatcher for Fixed {
        async fn dispatch_call(
            &self,
            _method: &str,
            _params: RequestParams,
        ) -> Result<Value, JsonRpcError> {
            Ok(json!("fixed"))
        }
    }

    let server = HttpRpcServerBuilder::new()
        .register_fn("ignored", |_| async move { Ok(json!(0)) }.boxed())
        .dispatcher(Arc::new(Fixed))
        .build();

    let response = server
        .handler
        .respond(kite_json_rpc::RpcPayload::from(r#"{"method":"anything","id":1}"#))
        .await
        .unwrap();

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["result"], json!("fixed"));
}
