use std::path::PathBuf;

/// Deployment or configuration mistakes found while resolving a controller.
///
/// Never a routing miss: the request was routed, but the routed identity
/// cannot be served by this kernel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Module '{module}' is not defined!")]
    UnknownModule { module: String },

    #[error(
        "Controller path for module '{module}' and controller '{controller}' is not defined! Expected to be: {}",
        .path.display()
    )]
    ControllerPathNotFound {
        module: String,
        controller: String,
        path: PathBuf,
    },

    #[error("invalid controller identity '{identity}': {reason}")]
    InvalidControllerIdentity { identity: String, reason: String },

    #[error("no controller registered for '{identity}'")]
    ControllerNotRegistered { identity: String },
}
