#![deny(rust_2018_idioms)]

//! An HTTP request router built on a compressed-prefix (radix) tree of
//! route patterns with named slots.
//!
//! ```rust
//! use slotmux::Router;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.get("/", "home")?;
//! router.get("/users/{id}", "a user")?;
//!
//! let matched = router.lookup("GET", "/users/1")?;
//! assert_eq!(matched.params.get("id"), Some("1"));
//! assert_eq!(*matched.handler, "a user");
//! # Ok(())
//! # }
//! ```
//!
//! ### Patterns
//!
//! A pattern is a path whose segments may contain *slots*, named holes
//! that capture a substring of the request path:
//!
//! ```text
//! Syntax           Type
//! {name}           required slot
//! {name?}          optional slot
//! {name*}          wildcard slot (must end the pattern)
//! {name|[0-9]+}    regexp-constrained slot
//! ```
//!
//! A required slot matches one demarcator-bounded run: it stops at the
//! next character the rest of the pattern expects, and never crosses a
//! `/`:
//!
//! ```text
//! Pattern: /users/{id}.{format}
//!
//!  /users/1.json      match: id="1", format="json"
//!  /users/1           no match
//! ```
//!
//! A wildcard slot swallows the entire remaining path:
//!
//! ```text
//! Pattern: /{owner}/{repo}/{branch}/{path*}
//!
//!  /acme/site/main/src/app.css    match: path="src/app.css"
//! ```
//!
//! Patterns containing optional or wildcard markers are *expanded*
//! into the concrete patterns they denote before insertion, one
//! concrete per marker plus the accumulated pattern. Registering
//! `/users/{id}.{format?}` registers `/users/{id}.` and
//! `/users/{id}.{format}` and routes both `/users/1.json` and nothing
//! else — `/users/1` stays unrouted because the literal `.` is part of
//! the prefix.
//!
//! Trailing slashes are trimmed from patterns and paths (`/` itself
//! excepted), and literal segments match ASCII-case-insensitively:
//! `/HI///` routes wherever `/hi` does. Captured values keep their
//! original case.
//!
//! ### How does it work?
//!
//! The router keeps one tree per HTTP method. Each tree is a compact
//! [radix tree](https://en.wikipedia.org/wiki/Radix_tree) whose edges
//! carry pattern sections; routes with a common prefix share a parent
//! node, and inserting a route splits an edge at the end of the common
//! prefix. All slot kinds occupy a single position in the prefix
//! space, so `/users/{id}` and `/users/{id}/edit` share the
//! `/users/{id}` spine.
//!
//! Lookup walks the tree depth-first, consuming the path edge by edge.
//! Where several children could continue a match, children whose edge
//! starts with a literal are tried before children whose edge starts
//! with a slot, which is why `/users/new` wins over `/users/{id}` for
//! a request to `/users/new`.
//!
//! Registration is expected to finish before serving starts: lookups
//! take `&self` and may run from any number of threads in parallel.
//!
//! ### Serving
//!
//! With the default `hyper-server` feature the router plugs into hyper
//! as a service: [`Router::middleware`] dispatches matched requests to
//! their [`Handler`]s — writing captured slots into the query string,
//! one `key=value` pair per slot — and hands unmatched requests to the
//! `next` handler; [`Router::into_service`] closes the chain with a
//! plain-text 404. See `demos/hyper.rs` for a runnable server.

mod error;
mod lexer;
mod params;
mod parser;
mod pattern;
mod router;
mod tree;

#[cfg(feature = "hyper-server")]
mod body;
#[cfg(feature = "hyper-server")]
mod service;

pub use error::{InsertError, MatchError, ParseError};
pub use lexer::TokenKind;
pub use params::{Params, ParamsIter};
pub use pattern::{Pattern, Section};
pub use router::{Group, RouteEntry, Router};
pub use tree::{Match, Tree};

#[cfg(feature = "hyper-server")]
pub use body::Body;
#[cfg(feature = "hyper-server")]
pub use service::{handler, BoxHandler, Handler, RouterService};
