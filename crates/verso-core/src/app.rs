//! Application builder and hyper server loop
//!
//! [`App`] ties the pieces together: the frozen variant registry, the
//! negotiation policy, the reader set, injected state, and a route table
//! derived from the registry's templates. Serving reads all of it through
//! `Arc`s; nothing is mutated after [`AppBuilder::build`].

use crate::dispatch::Dispatcher;
use crate::error::ApiError;
use crate::extract::ReaderSet;
use crate::negotiate::NegotiationPolicy;
use crate::registry::{RouteVersions, VariantRegistry};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::{RouteTable, RouteTableError};
use http::{Extensions, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builder for a versioned application.
pub struct AppBuilder {
    registry: Arc<VariantRegistry>,
    policy: NegotiationPolicy,
    readers: Option<ReaderSet>,
    state: Extensions,
}

impl AppBuilder {
    /// Start from a frozen registry and a negotiation policy.
    pub fn new(registry: VariantRegistry, policy: NegotiationPolicy) -> Self {
        // Initialize tracing if not already done
        let _ = tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,verso=debug")),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();

        Self {
            registry: Arc::new(registry),
            policy,
            readers: None,
            state: Extensions::new(),
        }
    }

    /// Replace the default reader set.
    pub fn readers(mut self, readers: ReaderSet) -> Self {
        self.readers = Some(readers);
        self
    }

    /// Add application state, available to handlers via `State<S>`.
    pub fn state<S: Clone + Send + Sync + 'static>(mut self, state: S) -> Self {
        self.state.insert(state);
        self
    }

    /// Freeze into a servable application.
    ///
    /// Fails when the registry's route templates conflict with each other;
    /// like duplicate registration, this aborts startup.
    pub fn build(self) -> Result<App, RouteTableError> {
        let table = RouteTable::from_templates(self.registry.route_templates())?;
        let mut dispatcher = Dispatcher::new(self.registry, self.policy);
        if let Some(readers) = self.readers {
            dispatcher = dispatcher.with_readers(readers);
        }
        Ok(App {
            table,
            dispatcher,
            state: Arc::new(self.state),
        })
    }
}

/// A built application: route table, dispatcher, shared state.
pub struct App {
    table: RouteTable,
    dispatcher: Dispatcher,
    state: Arc<Extensions>,
}

impl App {
    /// Version metadata for every registered route, for description layers.
    pub fn version_descriptions(&self) -> Vec<RouteVersions> {
        self.dispatcher.registry().version_descriptions()
    }

    /// Handle one request end to end: match the path, dispatch, respond.
    pub(crate) async fn handle(&self, req: Request) -> Response {
        let method = req.method().clone();
        let path = req.path().to_string();
        let start = std::time::Instant::now();

        let response = match self.table.match_path(&path) {
            Some(hit) => {
                let req = Request {
                    path_params: hit.params,
                    ..req
                };
                self.dispatcher.dispatch(&hit.template, req).await
            }
            None => ApiError::not_found(format!("No route found for {} {}", method, path))
                .into_response(),
        };

        log_request(&method, &path, response.status(), start);
        response
    }

    /// Build the internal request for one hyper request.
    async fn read_request(
        &self,
        req: hyper::Request<Incoming>,
    ) -> Result<Request, hyper::Error> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Request::new(parts, body, self.state.clone(), Default::default()))
    }

    /// Run the server.
    pub async fn run(self, addr: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = addr.parse()?;
        let listener = TcpListener::bind(addr).await?;
        let app = Arc::new(self);

        info!("verso serving on http://{}", addr);

        loop {
            let (stream, _remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let app = app.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<Incoming>| {
                    let app = app.clone();
                    async move {
                        let response = match app.read_request(req).await {
                            Ok(request) => app.handle(request).await,
                            Err(err) => ApiError::from(err).into_response(),
                        };
                        Ok::<_, Infallible>(response)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Connection error: {}", err);
                }
            });
        }
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn state_ref(&self) -> Arc<Extensions> {
        self.state.clone()
    }
}

/// Log request completion; non-success outcomes are logged at warn.
fn log_request(method: &http::Method, path: &str, status: StatusCode, start: std::time::Instant) {
    let elapsed = start.elapsed();

    if status.is_success() {
        info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request completed"
        );
    } else {
        warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %elapsed.as_millis(),
            "Request rejected"
        );
    }
}
