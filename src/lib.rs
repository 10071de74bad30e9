//! # routekernel
//!
//! **routekernel** is a staged request-dispatch kernel with a bidirectional
//! route pattern engine. Patterns like `/%module%/%controller%/%action%(/*)`
//! parse request URLs into a module/controller/action identity plus params,
//! and the same patterns generate URLs back from params.
//!
//! ## Architecture
//!
//! - **[`route`]** - Pattern compiler, matcher and URL generator
//! - **[`router`]** - Ordered, named route table with reverse routing
//! - **[`kernel`]** - The request pipeline ([`HttpKernel`])
//! - **[`events`]** - Typed pipeline events and the listener dispatcher
//! - **[`listeners`]** - Built-in listeners (tracing, metrics, result conversion, headers)
//! - **[`controller`]** - Controller trait, resolution and registry
//! - **[`plugin`]** - Lazy, memoized name to instance broker
//! - **[`view`]** - Template rendering with escaping and layouts
//! - **[`http`]** - Request and response values
//! - **[`config`]** - YAML configuration with `RK_*` environment overrides
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - The `routekernel` command-line tool
//!
//! ## Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Kernel as HttpKernel
//!     participant Events as EventDispatcher
//!     participant Router as RouteTable
//!     participant Registry as ControllerRegistry
//!     participant Controller
//!
//!     Caller->>Kernel: handle(&mut request)
//!     Kernel->>Events: onRoute
//!     Kernel->>Router: route(&mut request)
//!     Router-->>Kernel: matched route (identity + params written)
//!     Kernel->>Registry: resolve identity, build controller
//!     Kernel->>Events: onController
//!     Kernel->>Controller: dispatch(&mut request)
//!     Controller-->>Kernel: Outcome
//!     Kernel->>Events: onControllerResult (non-response outcomes)
//!     Kernel->>Events: onFilterResponse
//!     Kernel-->>Caller: Response
//! ```
//!
//! Any listener may answer early; the filter stage still runs on that
//! response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routekernel::config::KernelConfig;
//! use routekernel::controller::{Controller, Outcome};
//! use routekernel::http::Request;
//! use routekernel::HttpKernel;
//! use serde_json::json;
//!
//! struct PostController;
//!
//! impl Controller for PostController {
//!     fn dispatch(&mut self, request: &mut Request) -> anyhow::Result<Outcome> {
//!         Ok(Outcome::Json(json!({
//!             "action": request.action_name(),
//!             "id": request.param("id"),
//!         })))
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = KernelConfig::load("kernel.yaml")?;
//! let mut kernel = HttpKernel::from_config(&config)?;
//! kernel.register_controller("BlogModule::PostController", |_ctx| Box::new(PostController));
//!
//! let mut request = Request::get("/blog/post/view");
//! let response = kernel.handle(&mut request)?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## URL Generation
//!
//! ```rust
//! use routekernel::http::Params;
//! use routekernel::route::Route;
//!
//! let route = Route::new("/archive/%year%(/%month%)", Params::new()).unwrap();
//! let params: Params = [("year".to_string(), "2024".to_string())].into_iter().collect();
//! assert_eq!(route.url(&params, "page=2", "").unwrap(), "/archive/2024?page=2");
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod events;
pub mod http;
pub mod ids;
pub mod kernel;
pub mod listeners;
pub mod logging;
pub mod plugin;
pub mod route;
pub mod router;
pub mod view;

pub use config::KernelConfig;
pub use http::{Request, Response};
pub use kernel::{HttpKernel, KernelError};
pub use route::{Route, RouteError};
pub use router::{RouteTable, Router};
