use std::fs;
use std::process::Command;

const CONFIG: &str = r#"
base_url: /site/
routes:
  - name: page
    pattern: /page/%slug%
    defaults:
      controller: page
      action: show
  - name: default
    pattern: /%module%/%controller%/%action%(/*)
"#;

fn routekernel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_routekernel"));
    cmd.env_remove("RK_CONFIG")
        .env_remove("RK_BASE_URL")
        .env_remove("RK_MODULES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_match_uses_config_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("kernel.yaml");
    fs::write(&config, CONFIG).unwrap();

    let output = routekernel()
        .arg("--config")
        .arg(&config)
        .args(["match", "/site/page/about", "--json"])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["route"], "page");
    assert_eq!(report["controller"], "page");
    assert_eq!(report["params"]["slug"], "about");
}

#[test]
fn test_cli_env_config_and_base_url_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("kernel.yaml");
    fs::write(&config, CONFIG).unwrap();

    let output = routekernel()
        .env("RK_CONFIG", &config)
        .env("RK_BASE_URL", "/")
        .args(["match", "/page/contact"])
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("route:      page"), "{stdout}");
}

#[test]
fn test_cli_fails_on_unknown_route_name() {
    let output = routekernel()
        .args(["url", "missing", "id=1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[test]
fn test_cli_url_prints_generated_url() {
    let output = routekernel()
        .args(["url", "default", "module=docs", "controller=guide", "action=read", "-f", "intro"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "/docs/guide/read#intro\n");
}
