/// Errors raised while matching or generating route URLs.
///
/// A route simply not matching a path is *not* an error; that outcome is
/// [`RouteMatch::NoMatch`](super::RouteMatch::NoMatch).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The request URL does not start with the request's base URL.
    ///
    /// Signals a misconfigured base path, so routers must not swallow it and
    /// try the next route.
    #[error("request url does not match base url (request url: '{request_url}', base url: '{base_url}')")]
    Mismatch {
        request_url: String,
        base_url: String,
    },
    /// URL generation is missing required placeholders. Lists every one.
    #[error("missing params for getting url of route '{pattern}': {}", .missing.join(", "))]
    InvalidParams {
        pattern: String,
        missing: Vec<String>,
    },
    /// The pattern itself cannot be compiled (e.g. unbalanced parentheses).
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// No route of a router matched the request.
    #[error("no route matches request url '{request_url}'")]
    NotFound { request_url: String },
    /// Reverse routing asked for a route name the router does not know.
    #[error("no route named '{name}'")]
    UnknownRoute { name: String },
}
