use std::path::PathBuf;

use filament::config::{Config, LISTEN_ENV, ROOT_ENV};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.backlog, 10);
    assert_eq!(cfg.root, PathBuf::from("."));
    assert_eq!(cfg.cache_max_age, 31_536_000);
    assert!(cfg.gzip.enabled);
    assert!(cfg.default_content_type.is_none());
    assert!(cfg.content_types.is_empty());
}

// Env vars are process-wide, so every case that touches them lives here.
#[test]
fn test_config_env_overrides() {
    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(ROOT_ENV);
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");

    unsafe {
        std::env::set_var(LISTEN_ENV, "127.0.0.1:3000");
        std::env::set_var(ROOT_ENV, "/srv/www");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
    assert_eq!(cfg.root, PathBuf::from("/srv/www"));

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(ROOT_ENV);
    }
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml(
        r#"
listen_addr: "127.0.0.1:9000"
gzip:
  enabled: false
content_types:
  txt: text/plain
"#,
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    assert!(!cfg.gzip.enabled);
    assert_eq!(cfg.gzip.max_bytes, 8 * 1024 * 1024);
    assert_eq!(cfg.content_types.get("txt").unwrap(), "text/plain");
    assert_eq!(cfg.backlog, 10);
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filament.yaml");
    std::fs::write(&path, "cache_max_age: 60\nread_timeout_ms: 250\n").unwrap();

    let cfg = Config::from_file(path.to_str().unwrap()).unwrap();

    assert_eq!(cfg.cache_max_age, 60);
    assert_eq!(cfg.read_timeout().as_millis(), 250);
}

#[test]
fn test_config_invalid_yaml_is_an_error() {
    assert!(Config::from_yaml("backlog: [not a number]").is_err());
}

#[test]
fn test_config_socket_addr() {
    let mut cfg = Config::default();
    cfg.listen_addr = "127.0.0.1:8000".to_string();
    assert_eq!(cfg.socket_addr().unwrap().port(), 8000);

    cfg.listen_addr = "localhost".to_string();
    assert!(cfg.socket_addr().is_err());
}

#[test]
fn test_config_log_level_fallback() {
    let mut cfg = Config::default();
    cfg.log_level = "debug".to_string();
    assert_eq!(cfg.log_level(), tracing::Level::DEBUG);

    cfg.log_level = "loud".to_string();
    assert_eq!(cfg.log_level(), tracing::Level::INFO);
}
