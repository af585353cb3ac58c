#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use sdwire_client::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
dispatch:
  default_room: "lobby"
  skip_blank_linez: false # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.dispatch.default_room, "lobby");
    assert!(cfg.dispatch.skip_blank_lines);
    assert!(!cfg.output.include_raw);
    assert!(!cfg.output.errors_only);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
dispatch:
  default_room: "global"
  skip_blank_lines: false
output:
  include_raw: true
  errors_only: true
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.dispatch.default_room, "global");
    assert!(!cfg.dispatch.skip_blank_lines);
    assert!(cfg.output.include_raw);
    assert!(cfg.output.errors_only);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn rejects_bad_default_room() {
    for room in ["\"\"", "\"a|b\""] {
        let yaml = format!("version: 1\ndispatch:\n  default_room: {room}\n");
        let err = config::load_from_str(&yaml).expect_err("must fail");
        assert!(err.to_string().contains("default_room"), "{err}");
    }
}

#[test]
fn missing_file_is_bad_request() {
    let err = config::load_from_file("/nonexistent/sdwire.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
    assert!(err.to_string().contains("/nonexistent/sdwire.yaml not found"), "{err}");
}

#[test]
fn unreadable_path_is_internal() {
    // A directory exists but cannot be read as text.
    let err = config::load_from_file(std::env::temp_dir()).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INTERNAL");
}

#[test]
fn no_path_means_defaults() {
    let cfg = config::load(None).expect("defaults");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.dispatch.default_room, "lobby");
}
