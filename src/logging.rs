//! Structured logging setup
//!
//! Every component logs through `tracing` macros. This module installs the
//! subscriber that turns those events into output:
//! - JSON lines for production, pretty-printed for development
//! - `EnvFilter` level and per-target directives
//! - Optional sampling of low-severity events
//!
//! Configuration comes from `RK_LOG_*` environment variables, see
//! [`LogConfig::from_env`]. `RUST_LOG`, when set, wins over the configured level.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use tracing::subscriber::Interest;
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Which events reach the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Everything the filter lets through
    All,
    /// Only WARN and ERROR
    ErrorOnly,
    /// WARN and ERROR always, other levels at `sampling_rate`
    Sampled,
}

impl SamplingMode {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error-only" | "error_only" => SamplingMode::ErrorOnly,
            "sampled" => SamplingMode::Sampled,
            _ => SamplingMode::All,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub sampling_mode: SamplingMode,
    /// Fraction (0.0-1.0) of low-severity events kept in `Sampled` mode
    pub sampling_rate: f64,
    /// Extra `EnvFilter` directives, comma-separated
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl LogConfig {
    /// Read `RK_LOG_LEVEL`, `RK_LOG_FORMAT`, `RK_LOG_SAMPLING_MODE`,
    /// `RK_LOG_SAMPLING_RATE`, `RK_LOG_TARGET_FILTER` and
    /// `RK_LOG_INCLUDE_LOCATION`, falling back to production defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default_prod();
        Self {
            log_level: env::var("RK_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("RK_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            sampling_mode: env::var("RK_LOG_SAMPLING_MODE")
                .map(|s| SamplingMode::parse(&s))
                .unwrap_or(defaults.sampling_mode),
            sampling_rate: env::var("RK_LOG_SAMPLING_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sampling_rate),
            target_filter: env::var("RK_LOG_TARGET_FILTER").ok(),
            include_location: env::var("RK_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            sampling_mode: SamplingMode::All,
            sampling_rate: 1.0,
            target_filter: None,
            include_location: true,
        }
    }

    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            sampling_mode: SamplingMode::All,
            sampling_rate: 1.0,
            target_filter: None,
            include_location: false,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Drops events according to a [`SamplingMode`]
pub struct SamplingLayer {
    mode: SamplingMode,
    sampling_rate: f64,
    counter: AtomicU64,
}

impl SamplingLayer {
    pub fn new(mode: SamplingMode, sampling_rate: f64) -> Self {
        Self {
            mode,
            sampling_rate: sampling_rate.clamp(0.0, 1.0),
            counter: AtomicU64::new(0),
        }
    }

    fn should_sample(&self, level: &Level) -> bool {
        let severe = matches!(*level, Level::WARN | Level::ERROR);
        match self.mode {
            SamplingMode::All => true,
            SamplingMode::ErrorOnly => severe,
            SamplingMode::Sampled => {
                if severe {
                    return true;
                }
                if self.sampling_rate <= 0.0 {
                    return false;
                }
                let interval = (1.0 / self.sampling_rate) as u64;
                let count = self.counter.fetch_add(1, Ordering::Relaxed);
                interval > 0 && count % interval == 0
            }
        }
    }
}

impl<S> Layer<S> for SamplingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        // Event interest must not be cached: `enabled` decides per call.
        if metadata.is_event() && self.mode != SamplingMode::All {
            Interest::sometimes()
        } else {
            Interest::always()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: LayerContext<'_, S>) -> bool {
        // Spans always pass so that sampled events keep their context.
        !metadata.is_event() || self.should_sample(metadata.level())
    }
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    if let Some(target_filter) = &config.target_filter {
        for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
            }
        }
    }
    filter
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use routekernel::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env()).expect("logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(SamplingLayer::new(config.sampling_mode, config.sampling_rate))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_presets() {
        let dev = LogConfig::default_dev();
        assert_eq!(dev.log_level, "debug");
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.include_location);

        let prod = LogConfig::default_prod();
        assert_eq!(prod.log_level, "info");
        assert_eq!(prod.format, LogFormat::Json);
        assert_eq!(prod.sampling_mode, SamplingMode::All);
        assert!(!prod.include_location);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Json);
        assert_eq!(SamplingMode::parse("error_only"), SamplingMode::ErrorOnly);
        assert_eq!(SamplingMode::parse("sampled"), SamplingMode::Sampled);
        assert_eq!(SamplingMode::parse("bogus"), SamplingMode::All);
    }

    #[test]
    fn test_level_falls_back_to_info() {
        let mut config = LogConfig::default_prod();
        config.log_level = "WARN".to_string();
        assert_eq!(config.level(), Level::WARN);
        config.log_level = "loud".to_string();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_error_only_sampling() {
        let layer = SamplingLayer::new(SamplingMode::ErrorOnly, 1.0);
        assert!(!layer.should_sample(&Level::INFO));
        assert!(layer.should_sample(&Level::WARN));
        assert!(layer.should_sample(&Level::ERROR));
    }

    #[test]
    fn test_sampled_mode_keeps_every_nth_event() {
        let layer = SamplingLayer::new(SamplingMode::Sampled, 0.25);
        let kept = (0..100).filter(|_| layer.should_sample(&Level::DEBUG)).count();
        assert_eq!(kept, 25);
        assert!(layer.should_sample(&Level::ERROR));
    }

    #[derive(Clone, Default)]
    struct Buffer(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sampled_output(mode: SamplingMode, rate: f64, emit: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::registry()
            .with(SamplingLayer::new(mode, rate))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            );
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = buffer.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_sampled_mode_samples_each_callsite_under_subscriber() {
        let output = sampled_output(SamplingMode::Sampled, 0.5, || {
            for i in 0..10 {
                tracing::info!(i, "first callsite");
            }
            for i in 0..10 {
                tracing::info!(i, "second callsite");
            }
            tracing::warn!("always kept");
        });
        assert_eq!(output.matches("first callsite").count(), 5);
        assert_eq!(output.matches("second callsite").count(), 5);
        assert_eq!(output.matches("always kept").count(), 1);
    }

    #[test]
    fn test_error_only_mode_under_subscriber() {
        let output = sampled_output(SamplingMode::ErrorOnly, 1.0, || {
            for _ in 0..3 {
                tracing::info!("routine event");
                tracing::error!("failure event");
            }
        });
        assert_eq!(output.matches("routine event").count(), 0);
        assert_eq!(output.matches("failure event").count(), 3);
    }

    #[test]
    fn test_sampling_rate_is_clamped() {
        assert_eq!(SamplingLayer::new(SamplingMode::Sampled, -1.0).sampling_rate, 0.0);
        assert_eq!(SamplingLayer::new(SamplingMode::Sampled, 3.0).sampling_rate, 1.0);
        let silent = SamplingLayer::new(SamplingMode::Sampled, 0.0);
        assert!(!silent.should_sample(&Level::INFO));
    }
}
