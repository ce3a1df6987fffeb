//! Routing keys: the registration-time identifiers that associate a handler
//! with either a bare path or a (method, path) pair.
//!
//! Earlier revisions encoded method scoping positionally inside a single
//! string ("METHOD:/path") and classified keys at start time by whether the
//! first character was `/`, silently dropping anything that failed to split.
//! The tagged variants below carry the same two shapes explicitly and reject
//! malformed input when the key is constructed, so every accepted key is
//! installable.
use http::Method;
use thiserror::Error;

/// Errors surfaced while constructing or parsing a routing key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingKeyError {
    #[error("routing path is empty")]
    EmptyPath,

    #[error("routing path '{path}' must begin with '/'")]
    InvalidPath { path: String },

    #[error("HTTP method token is empty")]
    EmptyMethod,

    #[error("'{method}' is not a valid HTTP method token")]
    InvalidMethod { method: String },

    /// The method parses but the underlying router cannot filter on it
    /// (extension methods, CONNECT-like verbs).
    #[error("HTTP method '{method}' is not routable")]
    UnroutableMethod { method: String },

    /// A legacy composite key that does not split into method and path.
    #[error("malformed routing key '{key}': expected 'METHOD:/path'")]
    Malformed { key: String },
}

/// Identifier binding one handler into the route table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    /// Matches the path for every HTTP method not claimed by a
    /// [`RoutingKey::MethodScoped`] binding on the same path.
    PathOnly { path: String },
    /// Matches the path for exactly one HTTP method.
    MethodScoped { method: Method, path: String },
}

impl RoutingKey {
    /// Key matching `path` for any HTTP method.
    pub fn path_only(path: &str) -> Result<Self, RoutingKeyError> {
        Ok(Self::PathOnly {
            path: validate_path(path)?,
        })
    }

    /// Key matching `path` for `method` only. The token is trimmed and
    /// upper-cased before parsing, so "get" and "GET" are the same key.
    pub fn method_scoped(method: &str, path: &str) -> Result<Self, RoutingKeyError> {
        Ok(Self::MethodScoped {
            method: validate_method(method)?,
            path: validate_path(path)?,
        })
    }

    /// Parse a key in the legacy string encoding.
    ///
    /// A raw key is composite if and only if its first character is not `/`;
    /// composite keys split on the first `:` into method and path. Keys that
    /// earlier revisions silently dropped (no separator, empty halves) are
    /// errors here.
    pub fn parse(raw: &str) -> Result<Self, RoutingKeyError> {
        if raw.is_empty() {
            return Err(RoutingKeyError::EmptyPath);
        }
        if raw.starts_with('/') {
            return Self::path_only(raw);
        }
        match raw.split_once(':') {
            Some((method, path)) if !method.is_empty() && !path.is_empty() => {
                Self::method_scoped(method, path)
            }
            _ => Err(RoutingKeyError::Malformed {
                key: raw.to_string(),
            }),
        }
    }

    /// The path component, whichever shape the key has.
    pub fn path(&self) -> &str {
        match self {
            Self::PathOnly { path } => path,
            Self::MethodScoped { path, .. } => path,
        }
    }

    /// The method component, if the key is method-scoped.
    pub fn method(&self) -> Option<&Method> {
        match self {
            Self::PathOnly { .. } => None,
            Self::MethodScoped { method, .. } => Some(method),
        }
    }
}

impl std::fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathOnly { path } => f.write_str(path),
            Self::MethodScoped { method, path } => write!(f, "{method}:{path}"),
        }
    }
}

fn validate_path(path: &str) -> Result<String, RoutingKeyError> {
    if path.is_empty() {
        return Err(RoutingKeyError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(RoutingKeyError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(path.to_string())
}

fn validate_method(method: &str) -> Result<Method, RoutingKeyError> {
    let token = method.trim().to_ascii_uppercase();
    if token.is_empty() {
        return Err(RoutingKeyError::EmptyMethod);
    }
    let parsed =
        Method::from_bytes(token.as_bytes()).map_err(|_| RoutingKeyError::InvalidMethod {
            method: method.to_string(),
        })?;
    // The router filters on standard verbs only; reject anything else up
    // front instead of installing a route that can never match.
    if axum::routing::MethodFilter::try_from(parsed.clone()).is_err() {
        return Err(RoutingKeyError::UnroutableMethod {
            method: token.clone(),
        });
    }
    Ok(parsed)
}
