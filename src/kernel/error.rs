use crate::controller::ConfigurationError;
use crate::events::EventName;
use crate::plugin::PluginError;
use crate::route::RouteError;

/// No stage produced a response.
///
/// The controller returned something other than a response and no
/// `onControllerResult` listener converted it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Response type is not valid! You gave: {found}")]
pub struct PipelineIntegrityError {
    /// Description of the value the pipeline ended up with.
    pub found: String,
}

/// Everything [`HttpKernel::handle`](super::HttpKernel::handle) can fail with.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Integrity(#[from] PipelineIntegrityError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("controller '{identity}' failed: {source}")]
    Controller {
        identity: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("listener failed during {event}: {source}")]
    Listener {
        event: EventName,
        #[source]
        source: anyhow::Error,
    },
}

impl KernelError {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            KernelError::Route(RouteError::NotFound { .. }) => 404,
            _ => 500,
        }
    }
}
