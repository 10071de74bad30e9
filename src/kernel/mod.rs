//! # Kernel Module
//!
//! The staged request pipeline.
//!
//! ## Stages
//!
//! ```text
//! onRoute ──response?──────────────────────────────────────────┐
//!    │ no                                                      │
//! router.route(request) ──callback?────────────────────────────┤
//!    │ no                                                      │
//! resolve + build controller                                   │
//!    │                                                         │
//! onController ──response?─────────────────────────────────────┤
//!    │ no                                                      │
//! controller.dispatch(request)                                 │
//!    │ Outcome::Response ──────────────────────────────────────┤
//!    │ other outcome                                           │
//! onControllerResult ──response?───────────────────────────────┤
//!    │ no                                                      │
//! PipelineIntegrityError                                       │
//!                                                              ▼
//!                                                    onFilterResponse
//! ```
//!
//! No stage runs twice and nothing is retried. Every failure propagates to
//! the caller of [`HttpKernel::handle`] as a [`KernelError`].

mod core;
mod error;

pub use core::HttpKernel;
pub use error::{KernelError, PipelineIntegrityError};
