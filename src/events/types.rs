use std::fmt;

use crate::controller::{Controller, Outcome};
use crate::http::{Request, Response};

/// Names of the four pipeline events, in firing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Route,
    Controller,
    ControllerResult,
    FilterResponse,
}

impl EventName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Route => "onRoute",
            EventName::Controller => "onController",
            EventName::ControllerResult => "onControllerResult",
            EventName::FilterResponse => "onFilterResponse",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fired before routing. A response set here skips routing and the
/// controller entirely; only the filter stage still runs.
pub struct RouteEvent<'a> {
    request: &'a mut Request,
    response: Option<Response>,
}

impl<'a> RouteEvent<'a> {
    #[must_use]
    pub fn new(request: &'a mut Request) -> Self {
        Self {
            request,
            response: None,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &*self.request
    }

    /// The request may still be rewritten before it is routed.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut *self.request
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
    }

    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        self.response
    }
}

/// Fired once the controller is built, before it is dispatched.
///
/// Listeners may swap the controller or answer the request themselves.
pub struct ControllerEvent<'a> {
    request: &'a Request,
    controller: Box<dyn Controller>,
    response: Option<Response>,
}

impl<'a> ControllerEvent<'a> {
    #[must_use]
    pub fn new(request: &'a Request, controller: Box<dyn Controller>) -> Self {
        Self {
            request,
            controller,
            response: None,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    #[must_use]
    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn set_controller(&mut self, controller: Box<dyn Controller>) {
        self.controller = controller;
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
    }

    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    #[must_use]
    pub fn into_parts(self) -> (Box<dyn Controller>, Option<Response>) {
        (self.controller, self.response)
    }
}

/// Fired when a controller returned something other than a response.
///
/// This is where outcomes such as JSON values or view models become
/// responses. Setting a response stops the remaining listeners.
pub struct ControllerResultEvent<'a> {
    request: &'a Request,
    controller: &'a dyn Controller,
    outcome: Outcome,
    response: Option<Response>,
    propagation_stopped: bool,
}

impl<'a> ControllerResultEvent<'a> {
    #[must_use]
    pub fn new(request: &'a Request, controller: &'a dyn Controller, outcome: Outcome) -> Self {
        Self {
            request,
            controller,
            outcome,
            response: None,
            propagation_stopped: false,
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    #[must_use]
    pub fn controller(&self) -> &dyn Controller {
        self.controller
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    /// Set the response and stop propagation to later listeners.
    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
        self.stop_propagation();
    }

    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    #[must_use]
    pub fn into_parts(self) -> (Outcome, Option<Response>) {
        (self.outcome, self.response)
    }
}

/// Fired last with the final response, whichever stage produced it.
pub struct ResponseFilterEvent<'a> {
    request: &'a Request,
    response: Response,
}

impl<'a> ResponseFilterEvent<'a> {
    #[must_use]
    pub fn new(request: &'a Request, response: Response) -> Self {
        Self { request, response }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = response;
    }

    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}
