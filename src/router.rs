use std::collections::HashMap;
use std::fmt;

use http::Method;

use crate::error::{InsertError, MatchError};
use crate::pattern::Pattern;
use crate::tree::{trim_trailing_slash, Match, Tree};

/// Dispatches `(method, path)` pairs to handlers through one pattern
/// [`Tree`] per HTTP method.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = slotmux::Router::new();
/// router.get("/users/{id}", "show user")?;
/// router.post("/users", "create user")?;
///
/// let matched = router.lookup("GET", "/users/7")?;
/// assert_eq!(*matched.handler, "show user");
/// assert_eq!(matched.params.get("id"), Some("7"));
/// # Ok(())
/// # }
/// ```
pub struct Router<T> {
    trees: HashMap<Method, Tree<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Router {
            trees: HashMap::new(),
        }
    }
}

impl<T> Router<T> {
    /// Creates a router with no routes.
    pub fn new() -> Self {
        Router::default()
    }

    /// Registers a handler for GET requests.
    pub fn get(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("GET", route, handler)
    }

    /// Registers a handler for POST requests.
    pub fn post(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("POST", route, handler)
    }

    /// Registers a handler for PUT requests.
    pub fn put(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("PUT", route, handler)
    }

    /// Registers a handler for PATCH requests.
    pub fn patch(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("PATCH", route, handler)
    }

    /// Registers a handler for DELETE requests.
    pub fn delete(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("DELETE", route, handler)
    }

    /// Registers a handler under an explicit method. Anything outside
    /// the nine recognised HTTP methods is rejected.
    ///
    /// ```
    /// # fn main() -> Result<(), slotmux::InsertError> {
    /// let mut router = slotmux::Router::new();
    /// router.set("HEAD", "/{id}", "head")?;
    /// assert!(router.set("TEAPOT", "/", "nope").is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn set(&mut self, method: &str, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        if !is_method(method) {
            return Err(InsertError::Method {
                method: method.to_string(),
            });
        }
        let method = Method::from_bytes(method.as_bytes()).map_err(|_| InsertError::Method {
            method: method.to_string(),
        })?;
        self.trees.entry(method).or_default().insert(route, handler)
    }

    /// Looks up the handler for a request method and path. A method
    /// with no routes is itself a failed match.
    pub fn lookup<'r, 'p>(
        &'r self,
        method: &str,
        path: &'p str,
    ) -> Result<Match<'r, 'p, T>, MatchError> {
        let tree = Method::from_bytes(method.as_bytes())
            .ok()
            .and_then(|method| self.trees.get(&method))
            .ok_or_else(|| MatchError::NoMatch {
                path: trim_trailing_slash(path).to_string(),
            })?;
        tree.at(path)
    }

    /// Looks a handler up by its registered concrete pattern rather
    /// than by request path.
    pub fn find(&self, method: &str, pattern: &str) -> Result<(&Pattern, &T), MatchError> {
        let tree = Method::from_bytes(method.as_bytes())
            .ok()
            .and_then(|method| self.trees.get(&method))
            .ok_or_else(|| MatchError::NoMatch {
                path: pattern.to_string(),
            })?;
        tree.find(pattern)
    }

    /// Every registered route, ordered by method rank then pattern
    /// text. One entry per concrete expansion.
    pub fn routes(&self) -> Vec<RouteEntry<'_, T>> {
        let mut routes = Vec::new();
        for (method, tree) in &self.trees {
            tree.for_each(&mut |pattern, handler| {
                routes.push(RouteEntry {
                    method: method.clone(),
                    pattern,
                    handler,
                });
            });
        }
        routes.sort_by(|a, b| {
            method_rank(&a.method)
                .cmp(&method_rank(&b.method))
                .then_with(|| a.pattern.to_string().cmp(&b.pattern.to_string()))
        });
        routes
    }

    /// A registration view that joins `prefix` onto every pattern it
    /// registers, sharing this router's trees.
    ///
    /// ```
    /// # fn main() -> Result<(), slotmux::InsertError> {
    /// let mut router = slotmux::Router::new();
    /// let mut api = router.group("/api");
    /// api.get("/users/{id}", "api user")?;
    ///
    /// assert!(router.lookup("GET", "/api/users/3").is_ok());
    /// # Ok(())
    /// # }
    /// ```
    pub fn group(&mut self, prefix: &str) -> Group<'_, T> {
        Group {
            base: trim_trailing_slash(prefix).to_string(),
            router: self,
        }
    }
}

/// One registered route, as enumerated by [`Router::routes`].
pub struct RouteEntry<'r, T> {
    /// The HTTP method the route is registered under.
    pub method: Method,
    /// The concrete pattern stored in the tree.
    pub pattern: &'r Pattern,
    /// The registered handler.
    pub handler: &'r T,
}

impl<'r, T> fmt::Display for RouteEntry<'r, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// Registers routes under a shared path prefix. Created by
/// [`Router::group`]; groups nest.
pub struct Group<'r, T> {
    router: &'r mut Router<T>,
    base: String,
}

impl<'r, T> Group<'r, T> {
    /// Registers a handler for GET requests under the group prefix.
    pub fn get(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("GET", route, handler)
    }

    /// Registers a handler for POST requests under the group prefix.
    pub fn post(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("POST", route, handler)
    }

    /// Registers a handler for PUT requests under the group prefix.
    pub fn put(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("PUT", route, handler)
    }

    /// Registers a handler for PATCH requests under the group prefix.
    pub fn patch(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("PATCH", route, handler)
    }

    /// Registers a handler for DELETE requests under the group prefix.
    pub fn delete(&mut self, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        self.set("DELETE", route, handler)
    }

    /// Registers a handler under an explicit method and the group
    /// prefix.
    pub fn set(&mut self, method: &str, route: &str, handler: T) -> Result<(), InsertError>
    where
        T: Clone,
    {
        let route = join(&self.base, route);
        self.router.set(method, &route, handler)
    }

    /// A nested group under this group's prefix.
    pub fn group(&mut self, prefix: &str) -> Group<'_, T> {
        Group {
            base: join(&self.base, trim_trailing_slash(prefix)),
            router: &mut *self.router,
        }
    }
}

// joins a base prefix onto a route; the route keeps its leading slash
fn join(base: &str, route: &str) -> String {
    if base.is_empty() || base == "/" {
        return route.to_string();
    }
    if route == "/" {
        return base.to_string();
    }
    format!("{}{}", base, route)
}

fn is_method(method: &str) -> bool {
    matches!(
        method,
        "GET" | "HEAD" | "POST" | "PUT" | "PATCH" | "DELETE" | "CONNECT" | "OPTIONS" | "TRACE"
    )
}

fn method_rank(method: &Method) -> usize {
    match method.as_str() {
        "GET" => 0,
        "HEAD" => 1,
        "POST" => 2,
        "PUT" => 3,
        "PATCH" => 4,
        "DELETE" => 5,
        "CONNECT" => 6,
        "OPTIONS" => 7,
        "TRACE" => 8,
        _ => 9,
    }
}
