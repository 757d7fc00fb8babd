//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional `chatter.yaml`, inline YAML
//! snippets, then `CHATTER__`-prefixed environment variables (`__` separates
//! nesting, e.g. `CHATTER__PIPELINE__POST_LIMIT=5`). String values are then
//! expanded with `${VAR}` references, recursively up to a fixed depth.
//!
//! Credentials are usually written as `${REDDIT_CLIENT_ID}`-style references
//! so the file itself can be committed.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "CHATTER";

pub const DEFAULT_CONFIG_FILE: &str = "chatter.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatterConfig {
    #[serde(default)]
    pub reddit: Option<RedditConfig>,
    #[serde(default)]
    pub twitter: Option<TwitterConfig>,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reddit "script"/application-only OAuth credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    pub bearer_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Gemini {
        api_key: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<u32>,
    },
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".into()
}

/// Limits applied by the summarization pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub post_limit: u32,
    pub comments_per_post: usize,
    pub comment_chars: usize,
    pub blob_chars: usize,
    pub tweet_limit: u32,
    pub rate_limit_wait_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            post_limit: 10,
            comments_per_post: 5,
            comment_chars: 300,
            blob_chars: 3000,
            tweet_limit: 10,
            rate_limit_wait_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub llm_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            timeout_secs: 15,
            llm_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`.
    pub format: String,
    pub stderr: bool,
    pub dir: Option<String>,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".into(),
            stderr: true,
            dir: None,
            filter: "info".into(),
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
pub struct ChatterConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ChatterConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatterConfigLoader {
    /// Start with no file sources; environment overrides are always applied last.
    ///
    /// ```
    /// use chatter_config::ChatterConfigLoader;
    ///
    /// let config = ChatterConfigLoader::new()
    ///     .with_yaml_str("pipeline:\n  post_limit: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.pipeline.post_limit, 3);
    /// assert_eq!(config.pipeline.comment_chars, 300);
    /// assert!(config.reddit.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use chatter_config::{ChatterConfigLoader, LlmConfig};
    ///
    /// let cfg = ChatterConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// llm:
    ///   provider: gemini
    ///   api_key: "example"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// match cfg.llm {
    ///     Some(LlmConfig::Gemini { model, .. }) => assert_eq!(model, "gemini-1.5-flash"),
    ///     None => panic!("expected llm section"),
    /// }
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded after merging, so environment
    /// overrides may use them too.
    pub fn load(self) -> Result<ChatterConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
