//! # Route Module
//!
//! The route pattern engine: one pattern language, read in both directions.
//!
//! ## Pattern language
//!
//! - `%name%` is a placeholder; `name` is made of word characters, `:`, `.` and `-`.
//! - `( ... )` is an optional group. Groups nest.
//! - A trailing `(/*)` lets the pattern match any remaining sub-path, which is
//!   consumed but not bound to a name.
//!
//! Parentheses are always structural and never appear in a generated URL.
//!
//! ## Matching
//!
//! ```rust
//! use routekernel::http::Request;
//! use routekernel::route::{Route, RouteMatch};
//!
//! let route = Route::new("/%module%/%controller%/%action%(/*)", Default::default()).unwrap();
//! let mut request = Request::get("/blog/post/show/extra/stuff");
//!
//! assert_eq!(route.parse(&mut request).unwrap(), RouteMatch::Matched);
//! assert_eq!(request.module_name(), "blog");
//! assert_eq!(request.controller_name(), "post");
//! assert_eq!(request.action_name(), "show");
//! assert!(request.params().is_empty());
//! ```
//!
//! ## Generating
//!
//! ```rust
//! use routekernel::http::Params;
//! use routekernel::route::Route;
//!
//! let route = Route::new("/a/%b%/(c/%d%)", Params::new()).unwrap();
//! let mut params = Params::new();
//! params.insert("b".into(), "1".into());
//! assert_eq!(route.url(&params, "", "").unwrap(), "/a/1/");
//!
//! params.insert("d".into(), "2".into());
//! assert_eq!(route.url(&params, "", "").unwrap(), "/a/1/c/2");
//! ```

mod error;
mod generate;
mod pattern;
#[allow(clippy::module_inception)]
mod route;

pub use error::RouteError;
pub use pattern::{RoutePattern, CATCH_ALL_SUFFIX};
pub use route::{Route, RouteCallback, RouteMatch};
