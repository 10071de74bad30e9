//! # Router Module
//!
//! The router picks one [`Route`](crate::route::Route) out of many for an
//! incoming request.
//!
//! ## Overview
//!
//! [`RouteTable`] tries its routes in registration order and stops at the first
//! match. Three outcomes are possible:
//!
//! - a route matched: the request now carries the routed module, controller,
//!   action and params, and the route is returned;
//! - no route matched: [`RouteError::NotFound`](crate::route::RouteError::NotFound);
//! - the request URL is outside the request's base URL:
//!   [`RouteError::Mismatch`](crate::route::RouteError::Mismatch) from the first
//!   route tried. Later routes are not consulted, since every one of them would
//!   fail the same way.
//!
//! Routes are also addressable by name for URL generation:
//!
//! ```rust
//! use routekernel::config::RouteConfig;
//! use routekernel::http::Params;
//! use routekernel::router::RouteTable;
//!
//! let table = RouteTable::from_config(&[RouteConfig::default_route()]).unwrap();
//! let mut params = Params::new();
//! params.insert("module".into(), "blog".into());
//! assert_eq!(table.url("default", &params, "", "").unwrap(), "/blog/index/index");
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{RouteTable, Router};
