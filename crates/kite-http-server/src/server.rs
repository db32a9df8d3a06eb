//! Hyper server for mounting the RPC handler.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use kite_json_rpc::{JsonRpcError, MethodRegistry, RequestParams, RpcDispatcher, RpcMethod};

use crate::handler::{ErrorHook, RpcHttpHandler};
use crate::Result;

/// Configuration for the HTTP RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Path for the RPC endpoint
    pub rpc_path: String,
    /// Maximum request body size
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".parse().unwrap(),
            rpc_path: "/rpc".to_string(),
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Builder for the HTTP RPC server
pub struct HttpRpcServerBuilder {
    config: ServerConfig,
    registry: MethodRegistry,
    dispatcher: Option<Arc<dyn RpcDispatcher>>,
    error_hook: Option<ErrorHook>,
}

impl HttpRpcServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: MethodRegistry::new(),
            dispatcher: None,
            error_hook: None,
        }
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Set the RPC endpoint path
    pub fn rpc_path(mut self, path: impl Into<String>) -> Self {
        self.config.rpc_path = path.into();
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Register a method on the built-in registry
    pub fn register_method<M>(mut self, name: impl Into<String>, method: M) -> Self
    where
        M: RpcMethod + 'static,
    {
        self.registry.register(name, method);
        self
    }

    /// Register a closure as a method on the built-in registry
    pub fn register_fn<F>(mut self, name: impl Into<String>, method_fn: F) -> Self
    where
        F: Fn(RequestParams) -> BoxFuture<'static, std::result::Result<Value, JsonRpcError>>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_fn(name, method_fn);
        self
    }

    /// Use an external dispatcher instead of the built-in registry.
    /// Methods registered on the builder are ignored once this is set.
    pub fn dispatcher(mut self, dispatcher: Arc<dyn RpcDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Attach an error hook invoked once per failed call
    pub fn error_hook(mut self, hook: ErrorHook) -> Self {
        self.error_hook = Some(hook);
        self
    }

    /// Build the HTTP RPC server
    pub fn build(self) -> HttpRpcServer {
        let dispatcher = match self.dispatcher {
            Some(dispatcher) => dispatcher,
            None => Arc::new(self.registry),
        };

        let mut handler = RpcHttpHandler::new(self.config.clone(), dispatcher);
        if let Some(hook) = self.error_hook {
            handler = handler.with_error_hook(hook);
        }

        HttpRpcServer {
            config: self.config,
            handler: Arc::new(handler),
        }
    }
}

impl Default for HttpRpcServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP RPC server
pub struct HttpRpcServer {
    pub(crate) config: ServerConfig,
    pub(crate) handler: Arc<RpcHttpHandler>,
}

impl HttpRpcServer {
    pub fn builder() -> HttpRpcServerBuilder {
        HttpRpcServerBuilder::new()
    }

    /// Run the accept loop. Each connection is served on its own task.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        info!("HTTP RPC server listening on {}", self.config.bind_address);
        info!("RPC endpoint available at: {}", self.config.rpc_path);

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("New connection from {}", peer_addr);

            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let handler = Arc::clone(&handler);
                    async move { route_request(req, handler).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    // Filter out common client disconnection errors that aren't actual problems
                    let err_str = err.to_string();
                    if err_str.contains("connection closed before message completed") {
                        debug!("Client disconnected (normal): {}", err);
                    } else {
                        error!("Error serving connection: {}", err);
                    }
                }
            });
        }
    }
}

async fn route_request(
    req: Request<hyper::body::Incoming>,
    handler: Arc<RpcHttpHandler>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!("Handling {} {}", method, path);

    if path != handler.config.rpc_path {
        return Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .unwrap());
    }

    // Any HTTP method reaches the handler; method routing beyond the path is
    // the deployer's concern.
    match handler.handle_request(req).await {
        Ok(response) => Ok(response),
        Err(err) => {
            error!("Request handling error: {}", err);
            Ok(Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from(format!(
                    "Internal Server Error: {}",
                    err
                ))))
                .unwrap())
        }
    }
}
