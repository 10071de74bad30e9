use std::sync::Arc;

use serde_json::Value;

use crate::events::EventDispatcher;
use crate::http::{Request, Response};
use crate::plugin::{Pluggable, PluginBroker};
use crate::view::ViewModel;

/// A dispatchable controller.
///
/// Built fresh for every request by its registered factory; `dispatch` runs
/// the action named by the routed request.
pub trait Controller: Send {
    /// Run the routed action.
    ///
    /// # Errors
    ///
    /// Business failures; they abort the request as
    /// [`KernelError::Controller`](crate::kernel::KernelError::Controller).
    fn dispatch(&mut self, request: &mut Request) -> anyhow::Result<Outcome>;
}

/// What a controller action produced.
///
/// Only [`Outcome::Response`] is final. Everything else has to be turned
/// into a response by a listener during the `onControllerResult` event.
#[derive(Debug, Clone)]
pub enum Outcome {
    Response(Response),
    Json(Value),
    View(ViewModel),
    Text(String),
    Empty,
}

impl Outcome {
    /// Variant name, used in integrity errors.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Outcome::Response(_) => "Response",
            Outcome::Json(_) => "Json",
            Outcome::View(_) => "View",
            Outcome::Text(_) => "Text",
            Outcome::Empty => "Empty",
        }
    }

    #[must_use]
    pub fn is_response(&self) -> bool {
        matches!(self, Outcome::Response(_))
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Outcome::Response(response)
    }
}

impl From<ViewModel> for Outcome {
    fn from(model: ViewModel) -> Self {
        Outcome::View(model)
    }
}

/// What a controller factory gets to build a controller with.
pub struct ControllerContext<'a> {
    request: &'a Request,
    events: Arc<EventDispatcher>,
    plugins: Arc<PluginBroker>,
}

impl<'a> ControllerContext<'a> {
    #[must_use]
    pub fn new(request: &'a Request, events: Arc<EventDispatcher>, plugins: Arc<PluginBroker>) -> Self {
        Self {
            request,
            events,
            plugins,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    #[must_use]
    pub fn events(&self) -> Arc<EventDispatcher> {
        Arc::clone(&self.events)
    }

    #[must_use]
    pub fn plugins(&self) -> Arc<PluginBroker> {
        Arc::clone(&self.plugins)
    }
}

impl Pluggable for ControllerContext<'_> {
    fn plugin_broker(&self) -> &PluginBroker {
        &self.plugins
    }
}

/// Builds one controller per request.
pub type ControllerFactory =
    Arc<dyn Fn(&ControllerContext<'_>) -> Box<dyn Controller> + Send + Sync>;
