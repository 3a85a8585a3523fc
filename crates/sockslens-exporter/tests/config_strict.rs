#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use sockslens_core::{LabelMode, SocksLensError};
use sockslens_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
exporter:
  listen: "0.0.0.0:9150"
metrics:
  label_modez: constant # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, SocksLensError::InvalidConfig(_)), "got {err}");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:9150");
    assert_eq!(cfg.metrics.namespace, "sockslens");
    assert_eq!(cfg.metrics.label_mode, LabelMode::Constant);
    assert_eq!(cfg.metrics.constant_value, "request");
    assert_eq!(cfg.metrics.summary_max_age_secs, 3600);
}

#[test]
fn label_mode_parses_all_variants() {
    for (raw, want) in [
        ("constant", LabelMode::Constant),
        ("client_ip", LabelMode::ClientIp),
        ("remote_addr", LabelMode::RemoteAddr),
    ] {
        let cfg = config::load_from_str(&format!("version: 1\nmetrics:\n  label_mode: {raw}\n"))
            .expect("must parse");
        assert_eq!(cfg.metrics.label_mode, want);
    }
}

#[test]
fn unknown_label_mode_fails() {
    let err = config::load_from_str("version: 1\nmetrics:\n  label_mode: hostname\n")
        .expect_err("must fail");
    assert!(matches!(err, SocksLensError::InvalidConfig(_)), "got {err}");
}

#[test]
fn version_gate() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, SocksLensError::UnsupportedVersion(2)), "got {err}");
}

#[test]
fn summary_max_age_range_checked() {
    let err = config::load_from_str("version: 1\nmetrics:\n  summary_max_age_secs: 5\n")
        .expect_err("must fail");
    assert!(matches!(err, SocksLensError::InvalidConfig(_)), "got {err}");

    let ok = config::load_from_str("version: 1\nmetrics:\n  summary_max_age_secs: 600\n")
        .expect("must parse");
    assert_eq!(ok.metrics.summary_max_age_secs, 600);
}

#[test]
fn empty_constant_value_rejected() {
    let err = config::load_from_str("version: 1\nmetrics:\n  constant_value: \"\"\n")
        .expect_err("must fail");
    assert!(matches!(err, SocksLensError::InvalidConfig(_)), "got {err}");
}
