use std::sync::atomic::{AtomicUsize, Ordering};

use crate::events::{
    ControllerEvent, ControllerResultEvent, Listener, ResponseFilterEvent, RouteEvent,
};

/// Counts requests as they pass through the pipeline.
///
/// All counters are relaxed atomics; readings are eventually consistent.
///
/// - requests: every `onRoute`
/// - controllers: every `onController`, i.e. requests that were routed to a
///   controller rather than answered during routing
/// - converted results: every `onControllerResult`
/// - responses by status class: every `onFilterResponse`
#[derive(Debug, Default)]
pub struct MetricsListener {
    requests: AtomicUsize,
    controllers: AtomicUsize,
    controller_results: AtomicUsize,
    responses: AtomicUsize,
    status_classes: [AtomicUsize; 5],
}

impl MetricsListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn controller_count(&self) -> usize {
        self.controllers.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn controller_result_count(&self) -> usize {
        self.controller_results.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn response_count(&self) -> usize {
        self.responses.load(Ordering::Relaxed)
    }

    /// Requests that never reached a controller, whether answered early or failed.
    #[must_use]
    pub fn short_circuit_count(&self) -> usize {
        self.request_count().saturating_sub(self.controller_count())
    }

    /// Responses with a status in `class`xx, e.g. `status_count(4)` for 4xx.
    #[must_use]
    pub fn status_count(&self, class: u16) -> usize {
        match class {
            1..=5 => self.status_classes[usize::from(class - 1)].load(Ordering::Relaxed),
            _ => 0,
        }
    }
}

impl Listener for MetricsListener {
    fn on_route(&self, _event: &mut RouteEvent<'_>) -> anyhow::Result<()> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_controller(&self, _event: &mut ControllerEvent<'_>) -> anyhow::Result<()> {
        self.controllers.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_controller_result(&self, _event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        self.controller_results.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_filter_response(&self, event: &mut ResponseFilterEvent<'_>) -> anyhow::Result<()> {
        self.responses.fetch_add(1, Ordering::Relaxed);
        let class = event.response().status / 100;
        if (1..=5).contains(&class) {
            self.status_classes[usize::from(class - 1)].fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}
