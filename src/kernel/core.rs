use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::{KernelError, PipelineIntegrityError};
use crate::config::KernelConfig;
use crate::controller::{
    ConfigurationError, Controller, ControllerContext, ControllerRegistry, ControllerResolver,
    Outcome,
};
use crate::events::{
    ControllerEvent, ControllerResultEvent, Event, EventDispatcher, EventName, Listener,
    ResponseFilterEvent, RouteEvent,
};
use crate::http::{Request, Response};
use crate::listeners::{DefaultHeadersListener, JsonResultListener, TextResultListener, TracingListener};
use crate::plugin::PluginBroker;
use crate::router::{RouteTable, Router};
use crate::view::{ViewPlugin, ViewResultListener, VIEW_PLUGIN};

/// Result of one pipeline stage: carry on, or skip straight to the filter
/// stage with a response.
enum Stage<T> {
    Continue(T),
    ShortCircuit(Response),
}

/// The request-dispatch kernel.
///
/// [`handle`](Self::handle) runs the pipeline
/// route, build controller, controller event, controller result, validate,
/// filter response. Each stage may answer early; the filter stage always runs.
pub struct HttpKernel {
    router: Arc<dyn Router>,
    resolver: ControllerResolver,
    controllers: ControllerRegistry,
    events: Arc<EventDispatcher>,
    plugins: Arc<PluginBroker>,
    base_url: Option<String>,
}

impl HttpKernel {
    /// Kernel with no listeners, no plugins and no controllers.
    #[must_use]
    pub fn new(router: Arc<dyn Router>, resolver: ControllerResolver) -> Self {
        Self {
            router,
            resolver,
            controllers: ControllerRegistry::new(),
            events: Arc::new(EventDispatcher::new()),
            plugins: Arc::new(PluginBroker::new()),
            base_url: None,
        }
    }

    /// Kernel wired from configuration.
    ///
    /// Builds the route table, registers the `"view"` plugin and installs
    /// the tracing, JSON, text, view and default-header listeners.
    ///
    /// # Errors
    ///
    /// [`KernelError::Route`] for a route pattern that does not compile.
    pub fn from_config(config: &KernelConfig) -> Result<Self, KernelError> {
        let table = RouteTable::from_config(&config.routes)?;
        let mut kernel = Self::new(Arc::new(table), ControllerResolver::from_config(config));
        if config.base_url != "/" {
            kernel.base_url = Some(config.base_url.clone());
        }

        let views = config.views.clone();
        kernel
            .plugins
            .register(VIEW_PLUGIN, move || ViewPlugin::from_config(&views));

        kernel.add_listener(Arc::new(TracingListener));
        kernel.add_listener(Arc::new(JsonResultListener));
        kernel.add_listener(Arc::new(TextResultListener));
        kernel.add_listener(Arc::new(ViewResultListener::new(Arc::clone(&kernel.plugins))));
        if !config.response_headers.is_empty() {
            kernel.add_listener(Arc::new(DefaultHeadersListener::new(&config.response_headers)));
        }

        info!(
            modules = ?config.modules,
            routes = config.routes.len(),
            listeners = kernel.events.len(),
            "Kernel configured"
        );
        Ok(kernel)
    }

    #[must_use]
    pub fn with_controllers(mut self, controllers: ControllerRegistry) -> Self {
        self.controllers = controllers;
        self
    }

    #[must_use]
    pub fn with_event_dispatcher(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn with_plugin_broker(mut self, plugins: Arc<PluginBroker>) -> Self {
        self.plugins = plugins;
        self
    }

    /// Base URL stamped on requests still at the default `/`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Register a controller factory, see [`ControllerRegistry::register`].
    pub fn register_controller<F>(&mut self, identity: &str, factory: F)
    where
        F: Fn(&ControllerContext<'_>) -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.controllers.register(identity, factory);
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener>) {
        self.events.add_listener(listener);
    }

    #[must_use]
    pub fn router(&self) -> &Arc<dyn Router> {
        &self.router
    }

    #[must_use]
    pub fn resolver(&self) -> &ControllerResolver {
        &self.resolver
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    #[must_use]
    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    #[must_use]
    pub fn plugins(&self) -> &Arc<PluginBroker> {
        &self.plugins
    }

    /// Turn `request` into a response.
    ///
    /// The request is mutated in place: routing writes its module,
    /// controller, action and params.
    ///
    /// # Errors
    ///
    /// Routing, configuration, controller, listener and integrity failures,
    /// see [`KernelError`]. Nothing is retried.
    pub fn handle(&self, request: &mut Request) -> Result<Response, KernelError> {
        let start = Instant::now();
        if let Some(base_url) = &self.base_url {
            if request.base_url() == "/" {
                request.set_base_url(base_url.as_str());
            }
        }

        let response = match self.route_stage(request)? {
            Stage::ShortCircuit(response) => response,
            Stage::Continue(()) => {
                let (identity, controller) = self.build_controller(request)?;
                match self.controller_stage(request, controller)? {
                    Stage::ShortCircuit(response) => response,
                    Stage::Continue(mut controller) => {
                        let outcome = controller.dispatch(request).map_err(|source| {
                            error!(
                                request_id = %request.request_id(),
                                identity = %identity,
                                error = %source,
                                "Controller dispatch failed"
                            );
                            KernelError::Controller {
                                identity: identity.clone(),
                                source,
                            }
                        })?;
                        self.result_stage(request, &*controller, outcome)?
                    }
                }
            }
        };

        let response = self.filter_stage(request, response)?;
        info!(
            request_id = %request.request_id(),
            status = response.status,
            duration_us = start.elapsed().as_micros() as u64,
            "Request handled"
        );
        Ok(response)
    }

    fn route_stage(&self, request: &mut Request) -> Result<Stage<()>, KernelError> {
        let mut event = RouteEvent::new(request);
        self.fire(&mut event)?;
        if let Some(response) = event.into_response() {
            debug!(
                request_id = %request.request_id(),
                event = %EventName::Route,
                "Short-circuit: listener answered before routing"
            );
            return Ok(Stage::ShortCircuit(response));
        }

        let route = self.router.route(request)?;
        if let Some(response) = route.callback(request) {
            debug!(
                request_id = %request.request_id(),
                pattern = %route.pattern(),
                "Short-circuit: route callback answered"
            );
            return Ok(Stage::ShortCircuit(response));
        }
        Ok(Stage::Continue(()))
    }

    fn build_controller(&self, request: &Request) -> Result<(String, Box<dyn Controller>), KernelError> {
        let resolved = self
            .resolver
            .resolve(request.module_name(), request.controller_name())?;
        let factory = self.controllers.get(&resolved.identity).ok_or_else(|| {
            warn!(
                request_id = %request.request_id(),
                identity = %resolved.identity,
                registered = ?self.controllers.identities(),
                "Controller not registered"
            );
            ConfigurationError::ControllerNotRegistered {
                identity: resolved.identity.clone(),
            }
        })?;

        let context = ControllerContext::new(request, Arc::clone(&self.events), Arc::clone(&self.plugins));
        let controller = (**factory)(&context);
        debug!(
            request_id = %request.request_id(),
            identity = %resolved.identity,
            "Controller built"
        );
        Ok((resolved.identity, controller))
    }

    fn controller_stage(
        &self,
        request: &Request,
        controller: Box<dyn Controller>,
    ) -> Result<Stage<Box<dyn Controller>>, KernelError> {
        let mut event = ControllerEvent::new(request, controller);
        self.fire(&mut event)?;
        let (controller, response) = event.into_parts();
        match response {
            Some(response) => {
                debug!(
                    request_id = %request.request_id(),
                    event = %EventName::Controller,
                    "Short-circuit: listener answered before dispatch"
                );
                Ok(Stage::ShortCircuit(response))
            }
            None => Ok(Stage::Continue(controller)),
        }
    }

    fn result_stage(
        &self,
        request: &Request,
        controller: &dyn Controller,
        outcome: Outcome,
    ) -> Result<Response, KernelError> {
        if let Outcome::Response(response) = outcome {
            return Ok(response);
        }

        let mut event = ControllerResultEvent::new(request, controller, outcome);
        self.fire(&mut event)?;
        let (outcome, response) = event.into_parts();
        response.ok_or_else(|| {
            error!(
                request_id = %request.request_id(),
                outcome = outcome.describe(),
                "No response produced"
            );
            KernelError::Integrity(PipelineIntegrityError {
                found: outcome.describe().to_string(),
            })
        })
    }

    fn filter_stage(&self, request: &Request, response: Response) -> Result<Response, KernelError> {
        let mut event = ResponseFilterEvent::new(request, response);
        self.fire(&mut event)?;
        Ok(event.into_response())
    }

    fn fire<E: Event>(&self, event: &mut E) -> Result<(), KernelError> {
        self.events
            .dispatch(event)
            .map_err(|source| KernelError::Listener {
                event: E::NAME,
                source,
            })
    }
}

impl std::fmt::Debug for HttpKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpKernel")
            .field("resolver", &self.resolver)
            .field("controllers", &self.controllers)
            .field("events", &self.events)
            .field("plugins", &self.plugins)
            .field("base_url", &self.base_url)
            .finish()
    }
}
