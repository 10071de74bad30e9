//! # Events Module
//!
//! Extension points of the kernel pipeline.
//!
//! The kernel fires four events per request, always in this order and each
//! at most once:
//!
//! | Event                     | Name                 | May answer the request        |
//! |---------------------------|----------------------|-------------------------------|
//! | [`RouteEvent`]            | `onRoute`            | yes, skips routing/controller |
//! | [`ControllerEvent`]       | `onController`       | yes, skips dispatch           |
//! | [`ControllerResultEvent`] | `onControllerResult` | yes, stops further listeners  |
//! | [`ResponseFilterEvent`]   | `onFilterResponse`   | always runs, may alter        |
//!
//! Implement [`Listener`] and register it on the [`EventDispatcher`].

mod core;
mod types;

pub use core::{Event, EventDispatcher, Listener};
pub use types::{ControllerEvent, ControllerResultEvent, EventName, ResponseFilterEvent, RouteEvent};
