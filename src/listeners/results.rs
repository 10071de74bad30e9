use crate::controller::Outcome;
use crate::events::{ControllerResultEvent, Listener};
use crate::http::Response;

/// Serializes [`Outcome::Json`] into an `application/json` response.
#[derive(Debug, Default)]
pub struct JsonResultListener;

impl Listener for JsonResultListener {
    fn on_controller_result(&self, event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        if let Outcome::Json(value) = event.outcome() {
            let response = Response::json(200, value)?;
            event.set_response(response);
        }
        Ok(())
    }
}

/// Wraps [`Outcome::Text`] into a `text/plain` response.
#[derive(Debug, Default)]
pub struct TextResultListener;

impl Listener for TextResultListener {
    fn on_controller_result(&self, event: &mut ControllerResultEvent<'_>) -> anyhow::Result<()> {
        if let Outcome::Text(body) = event.outcome() {
            let response = Response::text(200, body.as_str());
            event.set_response(response);
        }
        Ok(())
    }
}
