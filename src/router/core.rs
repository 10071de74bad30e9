use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::RouteConfig;
use crate::http::{Params, Request};
use crate::route::{Route, RouteError, RouteMatch};

/// Selects the route for a request and applies it.
///
/// Implementations mutate the request (identity and params) through the
/// matching [`Route`] and hand the route back so the kernel can see its
/// inline callback.
pub trait Router: Send + Sync {
    /// Route `request`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Mismatch`] from any route aborts routing immediately;
    /// [`RouteError::NotFound`] when no route matches.
    fn route(&self, request: &mut Request) -> Result<Arc<Route>, RouteError>;
}

/// Ordered table of named routes. First match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, Arc<Route>)>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from configuration, keeping the configured order.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] for the first pattern that fails to compile.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        let mut table = Self::new();
        for cfg in routes {
            table.add_route(&cfg.name, Route::new(&cfg.pattern, cfg.defaults.clone())?);
        }

        let routes_summary: Vec<String> = table
            .routes
            .iter()
            .take(10)
            .map(|(name, route)| format!("{name} {}", route.pattern()))
            .collect();
        info!(
            routes_count = table.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(table)
    }

    /// Add a route under `name`.
    ///
    /// A route with the same name is replaced in place, keeping its position.
    pub fn add_route(&mut self, name: &str, route: Route) {
        let route = Arc::new(route);
        if let Some(&idx) = self.by_name.get(name) {
            warn!(
                route_name = %name,
                pattern = %route.pattern(),
                "Replaced existing route"
            );
            self.routes[idx].1 = route;
            return;
        }
        self.by_name.insert(name.to_string(), self.routes.len());
        self.routes.push((name.to_string(), route));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Route>> {
        self.by_name.get(name).map(|&idx| &self.routes[idx].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `(name, pattern)` pairs in matching order.
    #[must_use]
    pub fn patterns(&self) -> Vec<(String, String)> {
        self.routes
            .iter()
            .map(|(name, route)| (name.clone(), route.pattern().to_string()))
            .collect()
    }

    /// Write one line per route in matching order:
    /// `name<TAB>pattern`, then `<TAB>k=v,...` when the route has defaults
    /// and `<TAB>(callback)` when it answers inline.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_routes(&self, out: &mut dyn Write) -> io::Result<()> {
        for (name, route) in &self.routes {
            write!(out, "{name}\t{}", route.pattern())?;
            if !route.defaults().is_empty() {
                let defaults: Vec<String> = route
                    .defaults()
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                write!(out, "\t{}", defaults.join(","))?;
            }
            if route.has_callback() {
                write!(out, "\t(callback)")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Generate a URL from the named route.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownRoute`] for an unregistered name,
    /// [`RouteError::InvalidParams`] when required params are missing.
    pub fn url(
        &self,
        name: &str,
        params: &Params,
        query: &str,
        fragment: &str,
    ) -> Result<String, RouteError> {
        let route = self.get(name).ok_or_else(|| RouteError::UnknownRoute {
            name: name.to_string(),
        })?;
        route.url(params, query, fragment)
    }
}

impl RouteTable {
    /// Like [`Router::route`], also returning the name of the matched route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn route_named(&self, request: &mut Request) -> Result<(&str, &Arc<Route>), RouteError> {
        debug!(
            request_id = %request.request_id(),
            request_uri = %request.request_uri(),
            base_url = %request.base_url(),
            routes = self.routes.len(),
            "Route match attempt"
        );

        let match_start = Instant::now();

        for (name, route) in &self.routes {
            if let RouteMatch::Matched = route.parse(request)? {
                info!(
                    request_id = %request.request_id(),
                    route_name = %name,
                    pattern = %route.pattern(),
                    module = %request.module_name(),
                    controller = %request.controller_name(),
                    action = %request.action_name(),
                    duration_us = match_start.elapsed().as_micros() as u64,
                    "Route matched"
                );
                return Ok((name.as_str(), route));
            }
        }

        warn!(
            request_id = %request.request_id(),
            request_uri = %request.request_uri(),
            duration_us = match_start.elapsed().as_micros() as u64,
            "No route matched"
        );

        let request_uri = request.request_uri();
        Err(RouteError::NotFound {
            request_url: request_uri
                .split('?')
                .next()
                .unwrap_or(request_uri)
                .to_string(),
        })
    }
}

impl Router for RouteTable {
    fn route(&self, request: &mut Request) -> Result<Arc<Route>, RouteError> {
        self.route_named(request).map(|(_, route)| Arc::clone(route))
    }
}
