use super::{RouteTable, Router};
use crate::config::{KernelConfig, RouteConfig};
use crate::http::{Params, Request, Response};
use crate::route::{Route, RouteError};

fn example_config() -> &'static str {
    r#"
routes:
  - name: home
    pattern: "/"
    defaults: { controller: home }
  - name: news
    pattern: "/news(/%id%)"
    defaults: { module: blog, controller: news, action: show }
  - name: archive
    pattern: "/archive/%year%(/%month%)"
    defaults: { module: blog, controller: archive }
  - name: default
    pattern: "/%module%/%controller%/%action%(/*)"
"#
}

fn table() -> RouteTable {
    let config = KernelConfig::from_yaml_str(example_config()).unwrap();
    RouteTable::from_config(&config.routes).unwrap()
}

fn assert_routes_to(table: &RouteTable, uri: &str, expected: (&str, &str, &str)) -> Request {
    let mut request = Request::get(uri);
    table.route(&mut request).unwrap();
    assert_eq!(
        (
            request.module_name(),
            request.controller_name(),
            request.action_name()
        ),
        expected,
        "routing {uri}"
    );
    request
}

#[test]
fn test_root() {
    assert_routes_to(&table(), "/", ("default", "home", "index"));
}

#[test]
fn test_first_match_wins() {
    let request = assert_routes_to(&table(), "/news/42", ("blog", "news", "show"));
    assert_eq!(request.param("id"), Some("42"));
}

#[test]
fn test_optional_segment_route() {
    let request = assert_routes_to(&table(), "/archive/2024", ("blog", "archive", "index"));
    assert_eq!(request.param("year"), Some("2024"));
    assert_eq!(request.param("month"), None);
}

#[test]
fn test_falls_through_to_default_route() {
    let request = assert_routes_to(&table(), "/shop/cart/add/sku/1", ("shop", "cart", "add"));
    assert!(request.params().is_empty());
}

#[test]
fn test_no_route_matched() {
    let mut table = RouteTable::new();
    table.add_route("only", Route::new("/only", Params::new()).unwrap());
    let err = table.route(&mut Request::get("/other?x=1")).unwrap_err();
    assert_eq!(
        err,
        RouteError::NotFound {
            request_url: "/other".into()
        }
    );
}

#[test]
fn test_base_url_mismatch_is_not_a_miss() {
    let mut request = Request::get("/other/page").with_base_url("/app/");
    let err = table().route(&mut request).unwrap_err();
    assert!(matches!(err, RouteError::Mismatch { .. }));
}

#[test]
fn test_replacing_route_keeps_position() {
    let mut table = table();
    table.add_route(
        "home",
        Route::new("/", [("controller".to_string(), "landing".to_string())].into()).unwrap(),
    );
    assert_eq!(table.len(), 4);
    assert_eq!(table.patterns()[0], ("home".to_string(), "/".to_string()));
    assert_routes_to(&table, "/", ("default", "landing", "index"));
}

#[test]
fn test_matched_route_is_returned_with_callback() {
    let mut table = RouteTable::new();
    table.add_route(
        "ping",
        Route::new("/ping", Params::new())
            .unwrap()
            .with_callback(|_req| Response::text(200, "pong")),
    );
    let mut request = Request::get("/ping");
    let route = table.route(&mut request).unwrap();
    assert_eq!(route.callback(&request).map(|r| r.body), Some("pong".to_string()));
}

#[test]
fn test_write_routes_lists_defaults_and_callbacks() {
    let mut table = table();
    table.add_route(
        "ping",
        Route::new("/ping", Params::new())
            .unwrap()
            .with_callback(|_req| Response::text(200, "pong")),
    );
    let mut out = Vec::new();
    table.write_routes(&mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "home\t/\tcontroller=home");
    assert_eq!(lines[1], "news\t/news(/%id%)\taction=show,controller=news,module=blog");
    assert_eq!(lines[3], "default\t/%module%/%controller%/%action%(/*)");
    assert_eq!(lines[4], "ping\t/ping\t(callback)");
}

#[test]
fn test_url_by_name() {
    let table = table();
    let mut params = Params::new();
    params.insert("year".into(), "2024".into());
    assert_eq!(table.url("archive", &params, "", "").unwrap(), "/archive/2024");
    params.insert("month".into(), "05".into());
    assert_eq!(
        table.url("archive", &params, "p=2", "top").unwrap(),
        "/archive/2024/05?p=2#top"
    );
}

#[test]
fn test_url_unknown_route() {
    let err = table().url("nope", &Params::new(), "", "").unwrap_err();
    assert_eq!(err, RouteError::UnknownRoute { name: "nope".into() });
}

#[test]
fn test_invalid_pattern_in_config() {
    let routes = vec![RouteConfig {
        name: "broken".into(),
        pattern: "/a/(%b%".into(),
        defaults: Params::new(),
    }];
    assert!(matches!(
        RouteTable::from_config(&routes),
        Err(RouteError::InvalidPattern { .. })
    ));
}
