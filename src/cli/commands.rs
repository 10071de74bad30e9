use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde::Serialize;

use crate::config::KernelConfig;
use crate::http::{Params, Request};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::router::RouteTable;

/// Command-line interface for routekernel
///
/// Inspects a route table from a kernel configuration file: route URIs,
/// generate URLs, list routes.
#[derive(Parser, Debug)]
#[command(name = "routekernel")]
#[command(about = "Route and reverse-route URLs against a kernel configuration", long_about = None)]
pub struct Cli {
    /// Kernel configuration file (YAML). Without it the default
    /// `/%module%/%controller%/%action%(/*)` route is used.
    #[arg(short, long, global = true, env = "RK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a request URI and print the resolved module, controller, action and params
    Match {
        /// Request URI, e.g. `/blog/post/view/id/4?x=1`
        uri: String,

        /// Base URL the URI is relative to (overrides the configured one)
        #[arg(short, long)]
        base_url: Option<String>,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate a URL from a named route
    Url {
        /// Route name
        name: String,

        /// Route parameters as `key=value`
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Query string appended after `?`
        #[arg(short, long, default_value = "")]
        query: String,

        /// Fragment appended after `#`
        #[arg(short, long, default_value = "")]
        fragment: String,
    },
    /// List configured routes in matching order
    Routes,
}

/// Result of `match`, as printed by the CLI
#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub route: String,
    pub module: String,
    pub controller: String,
    pub action: String,
    pub params: Params,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=value: no '=' found in '{s}'"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> Result<KernelConfig> {
    let mut config = match path {
        Some(path) => KernelConfig::load(path)?,
        None => KernelConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - Logging cannot be initialized
/// - The configuration cannot be loaded or a route pattern is invalid
/// - Routing or URL generation fails
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let log_config = if cli.verbose {
        LogConfig::default_dev()
    } else {
        let mut config = LogConfig::from_env();
        if std::env::var("RK_LOG_LEVEL").is_err() {
            config.log_level = "warn".to_string();
        }
        config
    };
    init_logging_with_config(&log_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Run `cli` writing command output to `out`.
///
/// # Errors
///
/// See [`run_cli`].
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let table = RouteTable::from_config(&config.routes).context("Invalid route table")?;

    match &cli.command {
        Commands::Match {
            uri,
            base_url,
            method,
            json,
        } => {
            let report = route_uri(&table, &config, uri, base_url.as_deref(), method)?;
            if *json {
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            } else {
                writeln!(out, "route:      {}", report.route)?;
                writeln!(out, "module:     {}", report.module)?;
                writeln!(out, "controller: {}", report.controller)?;
                writeln!(out, "action:     {}", report.action)?;
                for (key, value) in &report.params {
                    writeln!(out, "param:      {key}={value}")?;
                }
            }
        }
        Commands::Url {
            name,
            params,
            query,
            fragment,
        } => {
            let params: Params = params.iter().cloned().collect();
            let url = table.url(name, &params, query, fragment)?;
            writeln!(out, "{url}")?;
        }
        Commands::Routes => table.write_routes(out)?,
    }
    Ok(())
}

fn route_uri(
    table: &RouteTable,
    config: &KernelConfig,
    uri: &str,
    base_url: Option<&str>,
    method: &str,
) -> Result<MatchReport> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| anyhow!("invalid HTTP method '{method}'"))?;
    let mut request =
        Request::new(method, uri).with_base_url(base_url.unwrap_or(config.base_url.as_str()));

    let (route_name, _) = table.route_named(&mut request)?;

    Ok(MatchReport {
        route: route_name.to_string(),
        module: request.module_name().to_string(),
        controller: request.controller_name().to_string(),
        action: request.action_name().to_string(),
        params: request.params().clone(),
    })
}
