//! Handler trait, boxed storage, and request-parts extractors

use crate::error::{ApiError, Result};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::version::ApiVersion;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::sync::Arc;

/// Trait for extracting data from request parts (headers, path, state)
pub trait FromRequestParts: Sized {
    /// Extract from request parts
    fn from_request_parts(req: &Request) -> Result<Self>;
}

/// State extractor
///
/// Extracts shared application state injected at startup. Sample data and
/// other handler collaborators are passed this way rather than through
/// globals, so no hidden mutable state is shared across requests.
#[derive(Debug, Clone)]
pub struct State<T>(pub T);

impl<T: Clone + Send + Sync + 'static> FromRequestParts for State<T> {
    fn from_request_parts(req: &Request) -> Result<Self> {
        req.state().get::<T>().cloned().map(State).ok_or_else(|| {
            ApiError::internal(format!(
                "State of type `{}` not found. Did you forget to call .state()?",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl<T> Deref for State<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Effective version extractor
///
/// The dispatcher records the negotiated version in request extensions
/// before invoking the variant handler; a handler that wants to know which
/// version it is serving takes this as an argument.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveVersion(pub ApiVersion);

impl FromRequestParts for EffectiveVersion {
    fn from_request_parts(req: &Request) -> Result<Self> {
        req.extensions()
            .get::<ApiVersion>()
            .copied()
            .map(EffectiveVersion)
            .ok_or_else(|| {
                ApiError::internal("No effective version recorded; handler invoked outside dispatch")
            })
    }
}

/// Optional extractor wrapper: `None` instead of an error on failure.
impl<T: FromRequestParts> FromRequestParts for Option<T> {
    fn from_request_parts(req: &Request) -> Result<Self> {
        Ok(T::from_request_parts(req).ok())
    }
}

/// Trait representing an async variant handler function
pub trait Handler<T>: Clone + Send + Sync + Sized + 'static {
    /// The response future
    type Future: Future<Output = Response> + Send + 'static;

    /// Call the handler with the request
    fn call(self, req: Request) -> Self::Future;
}

// Implement Handler for async functions with 0-3 extractors

// 0 args
impl<F, Fut, Res> Handler<()> for F
where
    F: FnOnce() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, _req: Request) -> Self::Future {
        Box::pin(async move { self().await.into_response() })
    }
}

// 1 arg
impl<F, Fut, Res, T1> Handler<(T1,)> for F
where
    F: FnOnce(T1) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
    T1: FromRequestParts + Send + 'static,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, req: Request) -> Self::Future {
        Box::pin(async move {
            let t1 = match T1::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            self(t1).await.into_response()
        })
    }
}

// 2 args
impl<F, Fut, Res, T1, T2> Handler<(T1, T2)> for F
where
    F: FnOnce(T1, T2) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
    T1: FromRequestParts + Send + 'static,
    T2: FromRequestParts + Send + 'static,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, req: Request) -> Self::Future {
        Box::pin(async move {
            let t1 = match T1::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            let t2 = match T2::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            self(t1, t2).await.into_response()
        })
    }
}

// 3 args
impl<F, Fut, Res, T1, T2, T3> Handler<(T1, T2, T3)> for F
where
    F: FnOnce(T1, T2, T3) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
    T1: FromRequestParts + Send + 'static,
    T2: FromRequestParts + Send + 'static,
    T3: FromRequestParts + Send + 'static,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, req: Request) -> Self::Future {
        Box::pin(async move {
            let t1 = match T1::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            let t2 = match T2::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            let t3 = match T3::from_request_parts(&req) {
                Ok(v) => v,
                Err(e) => return e.into_response(),
            };
            self(t1, t2, t3).await.into_response()
        })
    }
}

// Type-erased handler for storage in the registry
pub(crate) type BoxedHandler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Create a boxed handler from any Handler
pub(crate) fn into_boxed_handler<H, T>(handler: H) -> BoxedHandler
where
    H: Handler<T>,
    T: 'static,
{
    Arc::new(move |req| {
        let handler = handler.clone();
        Box::pin(async move { handler.call(req).await })
    })
}
