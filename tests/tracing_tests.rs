//! Structured log output of routing and the pipeline
//!
//! Installs a thread-local JSON subscriber writing into a buffer and checks
//! that route decisions and pipeline stages are logged with their fields.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use routekernel::config::KernelConfig;
use routekernel::http::{Params, Request, Response};
use routekernel::route::Route;
use routekernel::{HttpKernel, RouteTable, Router};
use routekernel::controller::ControllerResolver;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<serde_json::Value> {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.lines()
}

fn find<'a>(lines: &'a [serde_json::Value], message: &str) -> Option<&'a serde_json::Value> {
    lines
        .iter()
        .find(|line| line["fields"]["message"] == message)
}

#[test]
fn test_route_match_is_logged_with_identity() {
    let config = KernelConfig::default();
    let table = RouteTable::from_config(&config.routes).unwrap();

    let lines = capture(|| {
        let mut request = Request::get("/blog/post/view");
        table.route(&mut request).unwrap();
    });

    let matched = find(&lines, "Route matched").expect("route matched event");
    assert_eq!(matched["level"], "INFO");
    assert_eq!(matched["fields"]["route_name"], "default");
    assert_eq!(matched["fields"]["module"], "blog");
    assert_eq!(matched["fields"]["action"], "view");
    assert!(find(&lines, "Route match attempt").is_some());

    let pattern_matched = find(&lines, "Route pattern matched").expect("pattern matched event");
    assert_eq!(pattern_matched["level"], "DEBUG");
    assert_eq!(pattern_matched["fields"]["pattern"], "/%module%/%controller%/%action%(/*)");
    let decisions = lines
        .iter()
        .filter(|line| line["fields"]["message"] == "Route matched")
        .count();
    assert_eq!(decisions, 1);
}

#[test]
fn test_no_match_is_a_warning() {
    let mut table = RouteTable::new();
    table.add_route("about", Route::new("/about", Params::new()).unwrap());

    let lines = capture(|| {
        let _ = table.route(&mut Request::get("/contact"));
    });

    let missed = find(&lines, "No route matched").expect("no match event");
    assert_eq!(missed["level"], "WARN");
    assert_eq!(missed["fields"]["request_uri"], "/contact");
}

#[test]
fn test_base_url_mismatch_is_logged() {
    let table = RouteTable::from_config(&KernelConfig::default().routes).unwrap();

    let lines = capture(|| {
        let mut request = Request::get("/other/x").with_base_url("/app/");
        let _ = table.route(&mut request);
    });

    let mismatch = find(&lines, "Request url does not match base url").expect("mismatch event");
    assert_eq!(mismatch["level"], "WARN");
    assert_eq!(mismatch["fields"]["base_url"], "/app/");
}

#[test]
fn test_short_circuit_and_completion_are_logged() {
    let mut table = RouteTable::new();
    table.add_route(
        "health",
        Route::new("/health", Params::new())
            .unwrap()
            .with_callback(|_request| Response::text(200, "ok")),
    );
    let kernel = HttpKernel::new(
        Arc::new(table),
        ControllerResolver::new(Vec::new(), "unused", "%Module%"),
    );

    let lines = capture(|| {
        kernel.handle(&mut Request::get("/health")).unwrap();
    });

    assert!(find(&lines, "Short-circuit: route callback answered").is_some());
    let handled = find(&lines, "Request handled").expect("completion event");
    assert_eq!(handled["fields"]["status"], 200);
}
