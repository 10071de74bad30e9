//! # Listeners Module
//!
//! Built-in [`Listener`](crate::events::Listener)s.
//!
//! | Listener                 | Event                | Effect                                   |
//! |--------------------------|----------------------|------------------------------------------|
//! | [`TracingListener`]      | all                  | structured logs, `x-request-id` header   |
//! | [`MetricsListener`]      | all                  | request/controller/status counters       |
//! | [`JsonResultListener`]   | `onControllerResult` | `Outcome::Json` to `application/json`    |
//! | [`TextResultListener`]   | `onControllerResult` | `Outcome::Text` to `text/plain`          |
//! | [`DefaultHeadersListener`] | `onFilterResponse` | configured headers, unless already set   |
//!
//! The view listener lives in [`crate::view::ViewResultListener`].

mod headers;
mod metrics;
mod results;
mod tracing;

pub use headers::DefaultHeadersListener;
pub use metrics::MetricsListener;
pub use results::{JsonResultListener, TextResultListener};
pub use tracing::TracingListener;
