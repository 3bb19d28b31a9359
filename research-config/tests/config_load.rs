use research_config::ResearchConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "research.yaml",
        r#"
bird:
  binary: /opt/bird/bin/bird
  timeout_secs: 45
reddit:
  user_agent: "research-skill/1.0 (+ops@example.com)"
brave:
  api_key_env: MY_BRAVE_KEY
logging:
  format: json
  stderr: true
"#,
    );

    let config = ResearchConfigLoader::new()
        .with_file(p)
        .load()
        .expect("load config");

    assert_eq!(config.bird.binary, "/opt/bird/bin/bird");
    assert_eq!(config.bird.timeout().as_secs(), 45);
    assert_eq!(config.reddit.user_agent, "research-skill/1.0 (+ops@example.com)");
    assert_eq!(config.reddit.base_url, "https://www.reddit.com");
    assert_eq!(config.brave.api_key_env, "MY_BRAVE_KEY");
    assert!(config.brave.api_key.is_none());
    assert_eq!(config.logging.format, "json");
    assert!(config.logging.stderr);
    assert_eq!(config.logging.filter, "info");
}

#[test]
#[serial]
fn environment_wins_over_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "research.yaml", "brave:\n  timeout_secs: 20\n");

    temp_env::with_vars(
        [
            ("RESEARCH_BRAVE__TIMEOUT_SECS", Some("5")),
            ("RESEARCH_REDDIT__BASE_URL", Some("http://localhost:9999")),
        ],
        || {
            let config = ResearchConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load config");
            assert_eq!(config.brave.timeout_secs, 5);
            assert_eq!(config.reddit.base_url, "http://localhost:9999");
        },
    );
}

#[test]
#[serial]
fn optional_file_may_be_missing() {
    let tmp = TempDir::new().unwrap();
    let config = ResearchConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("missing optional file is fine");

    assert_eq!(config.bird.binary, "bird");
    assert_eq!(config.brave.api_key_env, "BRAVE_API_KEY");
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let err = ResearchConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();

    assert!(err.is_err());
}

#[test]
#[serial]
fn placeholders_expand_from_environment() {
    temp_env::with_var("TEST_BRAVE_SECRET", Some("from-vault"), || {
        let config = ResearchConfigLoader::new()
            .with_yaml_str("brave:\n  api_key: \"${TEST_BRAVE_SECRET}\"\n")
            .load()
            .expect("load config");
        assert_eq!(config.brave.api_key.as_deref(), Some("from-vault"));
    });
}

#[test]
#[serial]
fn all_digit_environment_values_load_as_strings() {
    temp_env::with_vars(
        [
            ("RESEARCH_BRAVE__API_KEY", Some("123456")),
            ("RESEARCH_REDDIT__USER_AGENT", Some("2024")),
            ("RESEARCH_BIRD__TIMEOUT_SECS", Some("12")),
        ],
        || {
            let config = ResearchConfigLoader::new().load().expect("load config");
            assert_eq!(config.brave.api_key.as_deref(), Some("123456"));
            assert_eq!(config.reddit.user_agent, "2024");
            assert_eq!(config.bird.timeout_secs, 12);
        },
    );
}
