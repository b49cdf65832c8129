use std::future::Future;
use std::sync::Arc;

use futures::future::{ready, BoxFuture};
use http::uri::{PathAndQuery, Uri};
use http::{header, Request, Response, StatusCode};
use hyper::service::Service;

use crate::body::Body;
use crate::router::Router;

/// An erased request handler, stored in the router and dispatched by
/// the middleware service. Any `Fn(Request<B>)` returning a response
/// future implements it.
pub trait Handler<B>: Send + Sync {
    fn call(&self, req: Request<B>) -> BoxFuture<'static, hyper::Result<Response<Body>>>;
}

impl<B, F, R> Handler<B> for F
where
    F: Fn(Request<B>) -> R + Send + Sync,
    R: Future<Output = hyper::Result<Response<Body>>> + Send + 'static,
{
    fn call(&self, req: Request<B>) -> BoxFuture<'static, hyper::Result<Response<Body>>> {
        Box::pin(self(req))
    }
}

/// A shared [`Handler`]. One registration fans out into a handler per
/// concrete expansion, so the router stores handlers behind an `Arc`.
pub type BoxHandler<B> = Arc<dyn Handler<B>>;

/// Boxes a handler function into a [`BoxHandler`].
pub fn handler<B, H>(handler: H) -> BoxHandler<B>
where
    B: 'static,
    H: Handler<B> + 'static,
{
    Arc::new(handler)
}

impl<B: 'static> Router<BoxHandler<B>> {
    /// Wraps the router into a service that dispatches matched
    /// requests to their handlers and everything else to `next`.
    ///
    /// On a match the captured slots are written into the request's
    /// query string, one `key=value` pair per slot: existing pairs
    /// under a captured key are replaced, the rest are preserved, and
    /// the result is re-encoded with keys in sorted order.
    pub fn middleware<N>(self, next: N) -> RouterService<B>
    where
        N: Handler<B> + 'static,
    {
        RouterService {
            router: Arc::new(self),
            next: Arc::new(next),
        }
    }

    /// A service with a plain-text 404 tail.
    pub fn into_service(self) -> RouterService<B> {
        self.middleware(not_found)
    }
}

/// Routes requests through a [`Router`] of [`BoxHandler`]s; unmatched
/// requests go to the `next` handler.
pub struct RouterService<B: 'static> {
    router: Arc<Router<BoxHandler<B>>>,
    next: Arc<dyn Handler<B>>,
}

impl<B: 'static> Clone for RouterService<B> {
    fn clone(&self) -> Self {
        RouterService {
            router: self.router.clone(),
            next: self.next.clone(),
        }
    }
}

impl<B: 'static> Service<Request<B>> for RouterService<B> {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, mut req: Request<B>) -> Self::Future {
        // the match borrows the request path, so pull what the
        // dispatch needs out before touching the request again
        let matched = {
            match self.router.lookup(req.method().as_str(), req.uri().path()) {
                Ok(matched) => {
                    let params: Vec<(String, String)> = matched
                        .params
                        .iter()
                        .map(|(key, value)| (key.to_string(), value.to_string()))
                        .collect();
                    Some((matched.handler.clone(), params))
                }
                Err(_) => None,
            }
        };
        let Some((handler, params)) = matched else {
            return self.next.call(req);
        };
        if !params.is_empty() {
            match rewrite_query(req.uri(), &params) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(err) => {
                    let response = plain(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
                    return Box::pin(ready(Ok(response)));
                }
            }
        }
        handler.call(req)
    }
}

// Sets one key=value pair per captured slot, replacing existing pairs
// under the same key and keeping the rest. Keys come out in sorted
// order, values under an untouched key in their original order.
fn rewrite_query(uri: &Uri, params: &[(String, String)]) -> Result<Uri, http::Error> {
    let mut pairs: Vec<(String, String)> = match uri.query() {
        Some(query) => form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        None => Vec::new(),
    };
    for (key, value) in params {
        pairs.retain(|(k, _)| k != key);
        pairs.push((key.clone(), value.clone()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    let path_and_query = format!("{}?{}", uri.path(), query);
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}

// the same text Go's http.NotFoundHandler writes
fn not_found<B>(_req: Request<B>) -> futures::future::Ready<hyper::Result<Response<Body>>> {
    ready(Ok(plain(StatusCode::NOT_FOUND, "404 page not found\n")))
}

fn plain(status: StatusCode, text: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(text))
        .unwrap()
}
