use std::fmt;

use crate::lexer::TokenKind;

/// Represents errors that can occur when parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer hit a malformed construct and stopped producing
    /// tokens. The payload is the lexer's message.
    Lex(String),
    /// A token appeared somewhere the grammar does not allow it.
    UnexpectedToken(TokenKind),
    /// A specific token was required and something else was found.
    Expected {
        /// The token the grammar required.
        expected: TokenKind,
        /// The token that was actually next.
        got: TokenKind,
    },
    /// Wildcard slots are only legal as the last pattern section.
    TrailingWildcard,
    /// A slot constraint failed to compile. The payload is the regexp
    /// compiler's diagnostic.
    Regex(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(message) => write!(f, "{}", message),
            Self::UnexpectedToken(kind) => write!(f, "unexpected token {}", kind),
            Self::Expected { expected, got } => write!(f, "expected {}, got {}", expected, got),
            Self::TrailingWildcard => {
                write!(f, "wildcard slots must be at the end of the path")
            }
            Self::Regex(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Represents errors that can occur when registering a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The pattern's concrete form is already registered in the tree.
    Duplicate {
        /// The offending pattern.
        route: String,
    },
    /// The method is not one of the nine recognised HTTP methods.
    Method {
        /// The rejected method string.
        method: String,
    },
    /// The pattern failed to parse.
    Parse(ParseError),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { route } => write!(f, "route already exists: {:?}", route),
            Self::Method { method } => write!(f, "{:?} is not a valid HTTP method", method),
            Self::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for InsertError {}

impl From<ParseError> for InsertError {
    fn from(err: ParseError) -> Self {
        InsertError::Parse(err)
    }
}

/// A failed lookup.
///
/// ```
/// use slotmux::{MatchError, Router};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.get("/hello", "Welcome!")?;
///
/// // no routes match
/// let err = router.lookup("GET", "/foobar").unwrap_err();
/// assert_eq!(err, MatchError::NoMatch { path: "/foobar".to_string() });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// No registered route matches the path.
    NoMatch {
        /// The path that failed to route, in its normalised form.
        path: String,
    },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch { path } => write!(f, "no match for {:?}", path),
        }
    }
}

impl std::error::Error for MatchError {}
