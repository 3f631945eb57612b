use wavetuner_config::load_toml;

#[test]
fn empty_input_yields_defaults() {
    let cfg = load_toml("").expect("parse empty TOML");
    assert_eq!(cfg.gain.min, -10);
    assert_eq!(cfg.gain.max, 60);
    assert_eq!(cfg.faults.retry_limit, 5);
    assert_eq!(cfg.faults.alc_range_limit, 12);
    assert_eq!(cfg.generator.prompt_timeout_ms, 30_000);
    assert!(cfg.driver.exclusions.is_empty());
    cfg.validate().expect("defaults validate");
}

#[test]
fn rejects_inverted_gain_bounds() {
    let toml = r#"
[gain]
min = 10
max = -5
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject min > max");
    assert!(format!("{err}").contains("gain.min"));
}

#[test]
fn rejects_zero_retry_limit() {
    let toml = r#"
[faults]
retry_limit = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject retry_limit=0");
    assert!(format!("{err}").contains("retry_limit"));
}

#[test]
fn rejects_zero_prompt_timeout() {
    let toml = r#"
[generator]
prompt_timeout_ms = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject prompt_timeout_ms=0");
    assert!(format!("{err}").contains("prompt_timeout_ms"));
}

#[test]
fn parses_full_config() {
    let toml = r#"
[gain]
min = -5
max = 40

[driver]
exclusions = ["CAL_", "broken"]

[faults]
retry_limit = 3
alc_range_limit = 8

[generator]
prompt_timeout_ms = 10000

[logging]
level = "debug"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("validates");
    assert_eq!(cfg.gain.min, -5);
    assert_eq!(cfg.gain.max, 40);
    assert_eq!(cfg.driver.exclusions, vec!["CAL_", "broken"]);
    assert_eq!(cfg.faults.retry_limit, 3);
    assert_eq!(cfg.faults.alc_range_limit, 8);
    assert_eq!(cfg.generator.prompt_timeout_ms, 10_000);
    assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
}
