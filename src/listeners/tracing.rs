use tracing::{debug, info};

use crate::events::{
    ControllerEvent, ControllerResultEvent, Listener, ResponseFilterEvent, RouteEvent,
};
use crate::ids::REQUEST_ID_HEADER;

/// Logs every pipeline event with the request id and echoes the id back
/// in the `x-request-id` response header.
#[derive(Debug, Default)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn on_route(&self, event: &mut RouteEvent<'_>) -> anyhow::Result<()> {
        let request = event.request();
        info!(
            request_id = %request.request_id(),
            method = %request.method(),
            request_uri = %request.request_uri(),
            base_url = %request.base_url(),
            "Request received"
        );
        Ok(())
    }

    fn on_controller(&self, event: &mut ControllerEvent<'_>) -> anyhow::Result<()> {
        let request = event.request();
        debug!(
            request_id = %request.request_id(),
            module = %request.module_name(),
            controller = %request.controller_name(),
            action = %request.action_name(),
            params = ?request.params(),
            "Controller ready"
        );
        Ok(())
    }

    fn on_controller_result(&self, event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        debug!(
            request_id = %event.request().request_id(),
            outcome = event.outcome().describe(),
            has_response = event.has_response(),
            "Controller result"
        );
        Ok(())
    }

    fn on_filter_response(&self, event: &mut ResponseFilterEvent<'_>) -> anyhow::Result<()> {
        let request_id = event.request().request_id();
        let response = event.response_mut();
        if response.get_header(REQUEST_ID_HEADER).is_none() {
            response.set_header(REQUEST_ID_HEADER, request_id.to_string());
        }
        info!(
            request_id = %request_id,
            status = response.status,
            bytes = response.body.len(),
            "Response ready"
        );
        Ok(())
    }
}
