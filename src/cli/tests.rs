//! Unit tests for CLI commands

use std::io::Write as _;

use clap::Parser;

use crate::cli::{execute, Cli, Commands};

const CONFIG: &str = r#"
routes:
  - name: article
    pattern: /news/%id%(/*)
    defaults:
      module: news
      controller: article
      action: show
  - name: default
    pattern: /%module%/%controller%/%action%(/*)
"#;

fn config_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    execute(&cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["routekernel", "match", "/a/b/c"],
        vec!["routekernel", "match", "/a/b/c", "--base-url", "/app/", "--json"],
        vec!["routekernel", "url", "default", "module=blog", "id=4"],
        vec!["routekernel", "--config", "kernel.yaml", "routes"],
        vec!["routekernel", "routes", "-v"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_url_params_require_equals() {
    assert!(Cli::try_parse_from(["routekernel", "url", "default", "module"]).is_err());
    assert!(Cli::try_parse_from(["routekernel", "url", "default", "=x"]).is_err());

    let cli = Cli::try_parse_from(["routekernel", "url", "default", "q=a=b"]).unwrap();
    match cli.command {
        Commands::Url { params, .. } => {
            assert_eq!(params, vec![("q".to_string(), "a=b".to_string())]);
        }
        _ => panic!("Expected Url command"),
    }
}

#[test]
fn test_match_with_default_route() {
    let output = run(&["routekernel", "match", "/blog/post/view/ignored/tail"]).unwrap();
    assert!(output.contains("route:      default"), "{output}");
    assert!(output.contains("module:     blog"), "{output}");
    assert!(output.contains("controller: post"), "{output}");
    assert!(output.contains("action:     view"), "{output}");
    assert!(!output.contains("param:"), "{output}");
}

#[test]
fn test_match_json_from_config_file() {
    let file = config_file();
    let path = file.path().to_str().unwrap();
    let output = run(&["routekernel", "-c", path, "match", "/app/news/7", "-b", "/app/", "--json"]).unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["route"], "article");
    assert_eq!(report["module"], "news");
    assert_eq!(report["action"], "show");
    assert_eq!(report["params"]["id"], "7");
}

#[test]
fn test_match_reports_base_mismatch() {
    let err = run(&["routekernel", "match", "/other/x", "--base-url", "/app/"]).unwrap_err();
    assert!(err.to_string().contains("/app/"), "{err}");
}

#[test]
fn test_url_generation() {
    let output = run(&[
        "routekernel",
        "url",
        "default",
        "module=blog",
        "controller=post",
        "action=view",
        "--query",
        "x=1",
    ])
    .unwrap();
    assert_eq!(output.trim(), "/blog/post/view?x=1");
}

#[test]
fn test_url_unknown_route() {
    let err = run(&["routekernel", "url", "nope"]).unwrap_err();
    assert!(err.to_string().contains("nope"), "{err}");
}

#[test]
fn test_routes_listing_keeps_order() {
    let file = config_file();
    let path = file.path().to_str().unwrap();
    let output = run(&["routekernel", "--config", path, "routes"]).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("article\t/news/%id%(/*)\t"));
    assert!(lines[0].contains("module=news"));
    assert_eq!(lines[1], "default\t/%module%/%controller%/%action%(/*)");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let err = run(&["routekernel", "--config", "/nonexistent/kernel.yaml", "routes"]).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read config file"));
}
