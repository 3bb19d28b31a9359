#![allow(dead_code)]

use research_common::observability::{LogConfig, LogFormat};
use std::path::PathBuf;
use std::sync::OnceLock;
use tempfile::TempDir;

static INIT_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "research-tests",
            log_dir: Some(std::env::temp_dir().join("research-tests")),
            emit_stderr: true,
            format: if std::env::var("RESEARCH_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        research_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Write an executable shell script standing in for `bird`.
#[cfg(unix)]
pub fn fake_bird(tmp: &TempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let p = tmp.path().join("bird");
    std::fs::write(&p, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&p, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    p
}

/// Minimal YAML config pointing every backend at test doubles.
pub fn write_config(tmp: &TempDir, base_url: &str, bird: Option<&PathBuf>) -> PathBuf {
    let mut yaml = format!(
        "reddit:\n  base_url: \"{base_url}\"\nbrave:\n  base_url: \"{base_url}\"\nlogging:\n  dir: \"{}\"\n",
        tmp.path().join("logs").display()
    );
    if let Some(bin) = bird {
        yaml.push_str(&format!("bird:\n  binary: \"{}\"\n", bin.display()));
    }
    let p = tmp.path().join("research.yaml");
    std::fs::write(&p, yaml).expect("write config");
    p
}
