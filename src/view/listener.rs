use std::sync::Arc;

use tracing::debug;

use super::{ViewPlugin, VIEW_PLUGIN};
use crate::controller::Outcome;
use crate::events::{ControllerResultEvent, Listener};
use crate::http::Response;
use crate::plugin::PluginBroker;

/// Turns [`Outcome::View`] into a `text/html` response through the
/// [`ViewPlugin`] registered in the broker under `"view"`.
pub struct ViewResultListener {
    plugins: Arc<PluginBroker>,
}

impl ViewResultListener {
    #[must_use]
    pub fn new(plugins: Arc<PluginBroker>) -> Self {
        Self { plugins }
    }
}

impl Listener for ViewResultListener {
    fn on_controller_result(&self, event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        let Outcome::View(model) = event.outcome() else {
            return Ok(());
        };
        let view = self.plugins.load_as::<ViewPlugin>(VIEW_PLUGIN)?;
        let body = view.render(event.request(), model)?;
        debug!(
            request_id = %event.request().request_id(),
            bytes = body.len(),
            "View rendered"
        );
        event.set_response(Response::html(200, body));
        Ok(())
    }
}
