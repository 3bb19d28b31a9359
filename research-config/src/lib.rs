//! Loader for research-skill configuration with YAML + environment overlays.
//!
//! Precedence, lowest to highest: built-in defaults, files/snippets in the order
//! they were added, then `RESEARCH_`-prefixed environment variables
//! (`RESEARCH_BRAVE__TIMEOUT_SECS=5` sets `brave.timeout_secs`). String values
//! may reference other variables as `${VAR}`.
use config::{Config, ConfigError, Environment, File};
use research_common::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "RESEARCH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub bird: BirdConfig,
    pub reddit: RedditConfig,
    pub brave: BraveConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub binary: String,
    pub timeout_secs: u64,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            binary: "bird".into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".into(),
            user_agent: USER_AGENT.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BraveConfig {
    pub base_url: String,
    /// Variable read on every call when `api_key` is not set.
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BraveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.search.brave.com".into(),
            api_key_env: "BRAVE_API_KEY".into(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for BraveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BraveConfig")
            .field("base_url", &self.base_url)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`.
    pub format: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".into(),
            filter: "info".into(),
            dir: None,
            stderr: false,
        }
    }
}

impl BirdConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RedditConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BraveConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `<config dir>/research-skill/research.yaml`, e.g. `~/.config/research-skill/research.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("research-skill").join("research.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct ResearchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ResearchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchConfigLoader {
    /// Start with defaults; `RESEARCH_` env overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use research_config::ResearchConfigLoader;
    ///
    /// let config = ResearchConfigLoader::new()
    ///     .with_yaml_str("bird:\n  binary: /usr/local/bin/bird")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.bird.binary, "/usr/local/bin/bird");
    /// assert_eq!(config.bird.timeout_secs, 30);
    /// assert_eq!(config.reddit.user_agent, "research-skill/1.0");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and deserialize.
    ///
    /// ```
    /// use research_config::ResearchConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOCTEST_BRAVE_TOKEN", "injected-from-env"); }
    ///
    /// let config = ResearchConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// brave:
    ///   api_key: "${DOCTEST_BRAVE_TOKEN}"
    ///   timeout_secs: 10
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.brave.api_key.as_deref(), Some("injected-from-env"));
    /// assert_eq!(config.brave.timeout().as_secs(), 10);
    /// assert_eq!(config.brave.base_url, "https://api.search.brave.com");
    ///
    /// unsafe { std::env::remove_var("DOCTEST_BRAVE_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<ResearchConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // config's deserializer coerces scalars, so an all-digit key still lands in a String
        Config::builder()
            .add_source(Config::try_from(&v)?)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Winston")), ("STATE", Some("NC"))], || {
            let mut v = json!([
                "hello-$CITY",
                { "loc": "${CITY}-${STATE}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Winston", { "loc": "Winston-NC" }, 42, true, null])
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_RESEARCH}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_RESEARCH}"));
    }

    #[test]
    fn debug_redacts_brave_key() {
        let cfg = BraveConfig {
            api_key: Some("sekrit".into()),
            ..Default::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("sekrit"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn default_path_ends_with_app_file() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("research-skill/research.yaml"));
        }
    }
}
