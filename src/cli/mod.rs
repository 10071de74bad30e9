//! # CLI Module
//!
//! Command-line access to a kernel's route table, for checking route
//! configuration without running an application.
//!
//! ## Commands
//!
//! ### `match`
//!
//! Route a URI and print what the kernel would dispatch to:
//!
//! ```bash
//! routekernel --config kernel.yaml match /blog/post/view/id/4
//! routekernel match /app/news/list --base-url /app/ --json
//! ```
//!
//! ### `url`
//!
//! Reverse-route a named route:
//!
//! ```bash
//! routekernel --config kernel.yaml url default module=blog controller=post action=view id=4
//! ```
//!
//! ### `routes`
//!
//! List routes in matching order:
//!
//! ```bash
//! routekernel --config kernel.yaml routes
//! ```
//!
//! `RK_CONFIG` can stand in for `--config`; the `RK_*` overrides of
//! [`KernelConfig::apply_env`](crate::config::KernelConfig::apply_env) apply.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use routekernel::cli::{execute, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["routekernel", "routes"]);
//! execute(&cli, &mut std::io::stdout())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, MatchReport};
