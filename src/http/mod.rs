//! # HTTP Module
//!
//! Request and response values that travel through the kernel pipeline.
//!
//! The transport layer (socket handling, HTTP parsing) lives outside this crate;
//! it builds a [`Request`], hands it to
//! [`HttpKernel::handle`](crate::kernel::HttpKernel::handle) and writes out the
//! returned [`Response`].

mod request;
mod response;

pub use request::{
    derive_base_url, HeaderVec, Params, Request, DEFAULT_ACTION, DEFAULT_CONTROLLER,
    DEFAULT_MODULE, MAX_INLINE_HEADERS,
};
pub use response::Response;
