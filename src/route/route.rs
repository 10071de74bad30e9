use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{RouteError, RoutePattern};
use crate::http::{Params, Request, Response};

/// Inline handler attached to a route; answers the request without a controller.
pub type RouteCallback = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// Outcome of trying one route against one request.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    /// The route matched and the request was updated.
    Matched,
    /// The route does not apply; the request is untouched.
    NoMatch,
}

impl RouteMatch {
    #[inline]
    #[must_use]
    pub fn is_matched(self) -> bool {
        self == RouteMatch::Matched
    }
}

/// One route: a compiled pattern, static default params and an optional callback.
#[derive(Clone)]
pub struct Route {
    pattern: RoutePattern,
    defaults: Params,
    callback: Option<RouteCallback>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("defaults", &self.defaults)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl Route {
    /// Compile `pattern` into a route with the given default params.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str, defaults: Params) -> Result<Self, RouteError> {
        Ok(Self {
            pattern: RoutePattern::compile(pattern)?,
            defaults,
            callback: None,
        })
    }

    /// Attach an inline handler.
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[inline]
    #[must_use]
    pub fn compiled(&self) -> &RoutePattern {
        &self.pattern
    }

    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &Params {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: Params) {
        self.defaults = defaults;
    }

    #[inline]
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Run the inline handler, if any.
    #[must_use]
    pub fn callback(&self, request: &Request) -> Option<Response> {
        self.callback.as_ref().map(|cb| cb(request))
    }

    /// Match the request against this route.
    ///
    /// On a match the merged params (request params, then captured values,
    /// then route defaults, later ones winning) are written back to the
    /// request; `module`, `controller` and `action` go to the request's
    /// identity fields instead of the generic params.
    ///
    /// # Errors
    ///
    /// [`RouteError::Mismatch`] when the request URL does not start with the
    /// request's base URL.
    pub fn parse(&self, request: &mut Request) -> Result<RouteMatch, RouteError> {
        let request_uri = request.request_uri();
        let request_url = request_uri.split('?').next().unwrap_or(request_uri);
        let base_url = request.base_url();

        if !request_url.starts_with(base_url) {
            warn!(
                request_id = %request.request_id(),
                request_url = %request_url,
                base_url = %base_url,
                "Request url does not match base url"
            );
            return Err(RouteError::Mismatch {
                request_url: request_url.to_string(),
                base_url: base_url.to_string(),
            });
        }

        let prefix_len = base_url.strip_suffix('/').unwrap_or(base_url).len();
        let path = &request_url[prefix_len..];

        let Some(extracted) = self.pattern.captures(path) else {
            debug!(
                request_id = %request.request_id(),
                pattern = %self.pattern.as_str(),
                path = %path,
                "Route did not match"
            );
            return Ok(RouteMatch::NoMatch);
        };

        let mut params = request.params().clone();
        params.extend(extracted);
        params.extend(
            self.defaults
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        if let Some(module) = params.remove("module") {
            request.set_module_name(module);
        }
        if let Some(controller) = params.remove("controller") {
            request.set_controller_name(controller);
        }
        if let Some(action) = params.remove("action") {
            request.set_action_name(action);
        }

        debug!(
            request_id = %request.request_id(),
            pattern = %self.pattern.as_str(),
            module = %request.module_name(),
            controller = %request.controller_name(),
            action = %request.action_name(),
            params = ?params,
            "Route pattern matched"
        );

        request.set_params(params);
        Ok(RouteMatch::Matched)
    }

    /// Generate a URL for this route, see [`RoutePattern::build`].
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidParams`] when required placeholders are missing.
    pub fn url(&self, params: &Params, query: &str, fragment: &str) -> Result<String, RouteError> {
        self.pattern.build(params, query, fragment)
    }
}
