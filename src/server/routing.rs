//! The routing server: accumulates handler bindings during a setup phase,
//! then materializes them into an axum route table and serves.
//!
//! Two registration conventions feed one table: bare paths that match every
//! HTTP method, and method-scoped entries that match exactly one. When both
//! shapes target the same path, the method-scoped binding wins for its verb
//! and the bare binding serves everything else.
use std::{collections::HashMap, convert::Infallible, net::SocketAddr, time::Duration};

use axum::{
    Router,
    extract::Request,
    handler::Handler,
    response::Response,
    routing::{MethodFilter, MethodRouter},
};
use thiserror::Error;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time::timeout};
use tower::util::BoxCloneSyncService;

use crate::server::{
    middleware,
    routing_key::{RoutingKey, RoutingKeyError},
};

/// Handlers are type-erased at registration so the binding table stays
/// homogeneous regardless of extractor signatures.
type BoxedHandler = BoxCloneSyncService<Request, Response, Infallible>;

/// Errors surfaced by the routing server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A registration was rejected; no binding was recorded.
    #[error(transparent)]
    Key(#[from] RoutingKeyError),

    /// The listener could not be established on the configured address
    /// (address in use, permission denied, unresolvable host).
    #[error("failed to bind listener on '{addr}'")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The serve loop terminated with a transport error.
    #[error("server I/O error")]
    Serve(#[source] std::io::Error),

    /// The serve task panicked or was cancelled out from under the handle.
    #[error("server task failed: {0}")]
    Join(String),

    /// `stop` gave up waiting for in-flight requests and aborted the server.
    #[error("shutdown deadline of {0:?} elapsed before in-flight requests drained")]
    ShutdownTimeout(Duration),
}

/// Builder-style HTTP server: register handlers, then start.
///
/// Registration takes `&mut self`, so the single-writer setup phase is
/// enforced by the borrow checker rather than caller discipline, and
/// [`RoutingServer::start`] consumes the server, making post-start
/// registration unrepresentable.
///
/// ```no_run
/// use plinth::server::RoutingServer;
///
/// # #[tokio::main] async fn main() -> Result<(), plinth::server::ServerError> {
/// let mut server = RoutingServer::new(":8000");
/// server.register("/health", || async { "ok" })?;
/// server.register_with_method("POST", "/orders", || async { "created" })?;
/// let handle = server.start().await?;
/// handle.stopped().await
/// # }
/// ```
pub struct RoutingServer {
    bind_addr: String,
    bindings: HashMap<RoutingKey, BoxedHandler>,
}

impl RoutingServer {
    /// Create a server that will bind `bind_addr` at start. The address is
    /// stored verbatim; `host:port` and the `:port` shorthand (all
    /// interfaces) are both accepted.
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            bindings: HashMap::new(),
        }
    }

    /// The configured bind address, as given at construction.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Number of distinct handler bindings currently registered.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bind `handler` to `path` for every HTTP method.
    ///
    /// Re-registering the same path replaces the prior handler.
    pub fn register<H, T>(&mut self, path: &str, handler: H) -> Result<(), ServerError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let key = RoutingKey::path_only(path)?;
        self.insert(key, erase(handler));
        Ok(())
    }

    /// Bind `handler` to `path` for `method` only.
    ///
    /// The method token is validated here; a token the router cannot filter
    /// on is a registration-time error rather than a route that never
    /// matches.
    pub fn register_with_method<H, T>(
        &mut self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<(), ServerError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let key = RoutingKey::method_scoped(method, path)?;
        self.insert(key, erase(handler));
        Ok(())
    }

    /// Bind `handler` under a pre-validated key, e.g. one produced by
    /// [`RoutingKey::parse`] from the legacy string encoding.
    pub fn register_key<H, T>(&mut self, key: RoutingKey, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.insert(key, erase(handler));
    }

    fn insert(&mut self, key: RoutingKey, service: BoxedHandler) {
        if self.bindings.insert(key.clone(), service).is_some() {
            tracing::debug!(key = %key, "replacing existing handler binding");
        }
    }

    /// Materialize the binding table into a router with the logging
    /// middleware applied, without binding a listener. Useful for tests and
    /// for embedding into a larger axum application.
    pub fn into_router(self) -> Router {
        Self::build_router(self.bindings)
    }

    /// Bind the configured address and serve on a background task.
    ///
    /// Listen failure is returned as [`ServerError::Listen`]; on success the
    /// returned [`ServerHandle`] controls the running server.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let target = listen_target(&self.bind_addr);
        let listener = TcpListener::bind(&target)
            .await
            .map_err(|source| ServerError::Listen {
                addr: self.bind_addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::Serve)?;

        tracing::info!(
            addr = %local_addr,
            bindings = self.bindings.len(),
            "routing server listening"
        );

        let router = Self::build_router(self.bindings);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .map_err(ServerError::Serve)
        });

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }

    /// Start and block until the server terminates. For callers that want a
    /// single "listen forever" call instead of a handle.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.start().await?.stopped().await
    }

    fn build_router(bindings: HashMap<RoutingKey, BoxedHandler>) -> Router {
        #[derive(Default)]
        struct PathEntry {
            any: Option<BoxedHandler>,
            scoped: Vec<(http::Method, BoxedHandler)>,
        }

        // Group by path; table iteration order is irrelevant because the
        // grouping is keyed and each (path, verb) slot is unique.
        let mut table: HashMap<String, PathEntry> = HashMap::new();
        for (key, service) in bindings {
            let entry = table.entry(key.path().to_string()).or_default();
            match key {
                RoutingKey::PathOnly { .. } => entry.any = Some(service),
                RoutingKey::MethodScoped { method, .. } => entry.scoped.push((method, service)),
            }
        }

        let mut router = Router::new();
        for (path, entry) in table {
            let mut method_router = MethodRouter::new();
            for (method, service) in entry.scoped {
                // Routability was checked when the key was constructed.
                let Ok(filter) = MethodFilter::try_from(method) else {
                    continue;
                };
                method_router = method_router.on_service(filter, service);
            }
            // Precedence: method-scoped bindings first; an any-method binding
            // becomes the fallback for every verb they do not claim.
            if let Some(service) = entry.any {
                method_router = method_router.fallback_service(service);
            }
            router = router.route(&path, method_router);
        }

        router.layer(middleware::request_trace_layer())
    }
}

fn erase<H, T>(handler: H) -> BoxedHandler
where
    H: Handler<T, ()>,
    T: 'static,
{
    BoxCloneSyncService::new(handler.with_state(()))
}

/// The `:port` shorthand means all interfaces.
fn listen_target(bind_addr: &str) -> String {
    if bind_addr.starts_with(':') {
        format!("0.0.0.0{bind_addr}")
    } else {
        bind_addr.to_string()
    }
}

/// Control handle for a started server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    /// The address the listener actually bound (resolves `:0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Graceful shutdown: stop accepting connections, wait up to `deadline`
    /// for in-flight requests to drain, then abort the serve task.
    pub async fn stop(mut self, deadline: Duration) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(());
        match timeout(deadline, &mut self.task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ServerError::Join(join_error.to_string())),
            Err(_) => {
                self.task.abort();
                Err(ServerError::ShutdownTimeout(deadline))
            }
        }
    }

    /// Wait for the server to terminate on its own.
    pub async fn stopped(self) -> Result<(), ServerError> {
        match self.task.await {
            Ok(result) => result,
            Err(join_error) => Err(ServerError::Join(join_error.to_string())),
        }
    }
}
