use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::types::{
    ControllerEvent, ControllerResultEvent, EventName, ResponseFilterEvent, RouteEvent,
};

/// Hooks into the kernel pipeline.
///
/// Every method defaults to a no-op, so a listener only implements the
/// events it cares about. An error aborts the request.
pub trait Listener: Send + Sync {
    fn on_route(&self, _event: &mut RouteEvent<'_>) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_controller(&self, _event: &mut ControllerEvent<'_>) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_controller_result(&self, _event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_filter_response(&self, _event: &mut ResponseFilterEvent<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A pipeline event that knows which [`Listener`] hook receives it.
pub trait Event {
    const NAME: EventName;

    fn deliver(&mut self, listener: &dyn Listener) -> anyhow::Result<()>;

    /// Checked after every listener; `true` skips the remaining ones.
    fn is_propagation_stopped(&self) -> bool {
        false
    }
}

impl Event for RouteEvent<'_> {
    const NAME: EventName = EventName::Route;

    fn deliver(&mut self, listener: &dyn Listener) -> anyhow::Result<()> {
        listener.on_route(self)
    }
}

impl Event for ControllerEvent<'_> {
    const NAME: EventName = EventName::Controller;

    fn deliver(&mut self, listener: &dyn Listener) -> anyhow::Result<()> {
        listener.on_controller(self)
    }
}

impl Event for ControllerResultEvent<'_> {
    const NAME: EventName = EventName::ControllerResult;

    fn deliver(&mut self, listener: &dyn Listener) -> anyhow::Result<()> {
        listener.on_controller_result(self)
    }

    fn is_propagation_stopped(&self) -> bool {
        ControllerResultEvent::is_propagation_stopped(self)
    }
}

impl Event for ResponseFilterEvent<'_> {
    const NAME: EventName = EventName::FilterResponse;

    fn deliver(&mut self, listener: &dyn Listener) -> anyhow::Result<()> {
        listener.on_filter_response(self)
    }
}

/// Ordered listener list shared by the kernel and its controllers.
///
/// Listeners run in registration order. Dispatch works on a snapshot of the
/// list, so a listener may register further listeners without deadlocking;
/// they take effect from the next event on.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<Vec<Arc<dyn Listener>>>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener>) {
        self.listeners.write().push(listener);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Deliver `event` to each listener until one stops propagation.
    ///
    /// # Errors
    ///
    /// The first listener error; later listeners do not run.
    pub fn dispatch<E: Event>(&self, event: &mut E) -> anyhow::Result<()> {
        let listeners: Vec<Arc<dyn Listener>> = self.listeners.read().clone();
        for (idx, listener) in listeners.iter().enumerate() {
            if let Err(err) = event.deliver(listener.as_ref()) {
                warn!(
                    event = %E::NAME,
                    listener_idx = idx,
                    error = %err,
                    "Listener failed"
                );
                return Err(err);
            }
            if event.is_propagation_stopped() {
                debug!(
                    event = %E::NAME,
                    listener_idx = idx,
                    listener_name = std::any::type_name_of_val(listener.as_ref()),
                    skipped = listeners.len() - idx - 1,
                    "Event propagation stopped"
                );
                break;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.len())
            .finish()
    }
}
