//! Loader for Faleproxy configuration with YAML + environment overlays.
//!
//! Sources are merged in order: optional/required YAML files, inline YAML
//! snippets, then `FALEPROXY__SECTION__KEY` environment variables. String
//! values may reference `${VAR}` placeholders, expanded before the typed
//! structs are built. Every section has defaults, so an empty source set is
//! a valid configuration.
use config::{Config, ConfigError, Environment, File};
use faleproxy_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FaleproxyConfig {
    pub server: ServerConfig,
    pub substitution: SubstitutionConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported verbatim by `GET /health`.
    pub environment: String,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            environment: "development".into(),
            static_dir: PathBuf::from("public"),
        }
    }
}

/// The term pair applied to every fetched page.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SubstitutionConfig {
    pub source: String,
    pub replacement: String,
}

impl Default for SubstitutionConfig {
    fn default() -> Self {
        Self {
            source: "Yale".into(),
            replacement: "Fale".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub retries: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            retries: 2,
            user_agent: concat!("faleproxy/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub stderr: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            stderr: true,
            dir: None,
        }
    }
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

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FaleproxyConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FaleproxyConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FaleproxyConfigLoader {
    /// Start empty; files are opt-in and `FALEPROXY__` env overrides are
    /// layered on top of them in [`load`](Self::load).
    ///
    /// ```
    /// use faleproxy_config::FaleproxyConfigLoader;
    ///
    /// let config = FaleproxyConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.substitution.source, "Yale");
    /// assert_eq!(config.substitution.replacement, "Fale");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate
    /// infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so headless deployments can rely
    /// purely on environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use faleproxy_config::FaleproxyConfigLoader;
    ///
    /// let cfg = FaleproxyConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// server:
    ///   port: 8080
    /// substitution:
    ///   source: "Harvard"
    ///   replacement: "Farvard"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.server.port, 8080);
    /// assert_eq!(cfg.substitution.source, "Harvard");
    /// assert_eq!(cfg.fetch.retries, 2);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly
    /// typed config, expanding `${VAR}` placeholders on the way.
    pub fn load(self) -> Result<FaleproxyConfig, ConfigError> {
        // Later sources win, so env goes last.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("FALEPROXY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: FaleproxyConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FALEPROXY_TEST_FOO", Some("bar"), || {
            let mut v = json!("prefix-${FALEPROXY_TEST_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars(
            [("FP_CITY", Some("New Haven")), ("FP_STATE", Some("CT"))],
            || {
                let mut v = json!([
                    "hello-$FP_CITY",
                    { "loc": "${FP_CITY}-${FP_STATE}" },
                    42,
                    true,
                    null
                ]);
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!(["hello-New Haven", { "loc": "New Haven-CT" }, 42, true, null])
                );
            },
        );
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("FP_BAZ", Some("qux")),
                ("FP_BAR", Some("mid-${FP_BAZ}")),
                ("FP_FOO", Some("start-${FP_BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FP_FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("FP_A", Some("${FP_B}")), ("FP_B", Some("${FP_A}"))], || {
            let mut v = json!("x=${FP_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${FALEPROXY_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${FALEPROXY_DOES_NOT_EXIST}"));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg = FaleproxyConfigLoader::new()
            .with_yaml_str("fetch:\n  retries: 0\nlogging:\n  format: json\n")
            .load()
            .unwrap();

        assert_eq!(cfg.fetch.retries, 0);
        assert_eq!(cfg.fetch.timeout_secs, 15);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.server.static_dir, PathBuf::from("public"));
    }
}
