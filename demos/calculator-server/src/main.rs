//! Calculator JSON-RPC server demo.
//!
//! Run it, then:
//!
//! ```text
//! curl -s -X POST localhost:8000/rpc \
//!   -d '{"method":"add","params":{"a":1,"b":2},"id":"x1"}'
//! ```

use std::sync::Arc;

use anyhow::Result;
use futures::FutureExt;
use serde_json::{Value, json};
use tracing::{info, warn};

use kite_http_server::HttpRpcServer;
use kite_json_rpc::{JsonRpcError, RequestParams};

fn number(params: &RequestParams, name: &str) -> std::result::Result<f64, JsonRpcError> {
    params.get(name).and_then(Value::as_f64).ok_or_else(|| {
        JsonRpcError::invalid_params(&format!("'{}' is required and must be a number", name))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server = HttpRpcServer::builder()
        .register_fn("add", |params| {
            async move {
                let a = number(&params, "a")?;
                let b = number(&params, "b")?;
                Ok(json!(a + b))
            }
            .boxed()
        })
        .register_fn("subtract", |params| {
            async move {
                let a = number(&params, "a")?;
                let b = number(&params, "b")?;
                Ok(json!(a - b))
            }
            .boxed()
        })
        .register_fn("divide", |params| {
            async move {
                let a = number(&params, "a")?;
                let b = number(&params, "b")?;
                if b == 0.0 {
                    return Err(JsonRpcError::server_error(-32000, "division by zero", None));
                }
                Ok(json!(a / b))
            }
            .boxed()
        })
        .error_hook(Arc::new(|_request, _response, error| {
            warn!("call failed: {}", error);
        }))
        .build();

    info!("calculator demo starting");
    server.run().await?;
    Ok(())
}
