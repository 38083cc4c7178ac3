use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub max_notes: Option<usize>,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

/// Flat view of the `JOURNAL_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    host: Option<String>,
    port: Option<u16>,
    max_notes: Option<usize>,
    llm_base_url: Option<String>,
    llm_model: Option<String>,
    #[serde(default, with = "humantime_serde")]
    llm_timeout: Option<Duration>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_notes: None,
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout: default_timeout(),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn overlay(mut self, env: EnvConfig) -> Self {
        if let Some(host) = env.host {
            self.host = host;
        }
        if let Some(port) = env.port {
            self.port = port;
        }
        if env.max_notes.is_some() {
            self.max_notes = env.max_notes;
        }
        if let Some(base_url) = env.llm_base_url {
            self.summarizer.base_url = base_url;
        }
        if let Some(model) = env.llm_model {
            self.summarizer.model = model;
        }
        if let Some(timeout) = env.llm_timeout {
            self.summarizer.timeout = timeout;
        }
        self
    }
}

fn load_from_env() -> Result<Config, envy::Error> {
    let env_config = envy::prefixed("JOURNAL_").from_env::<EnvConfig>()?;
    Ok(Config::default().overlay(env_config))
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("JOURNAL_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, loading configuration from JOURNAL_* environment variables"
    );
    load_from_env().map_err(|e| {
        format!(
            "Config file not found and environment variables are invalid. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}

/// Reads the summarization credential. A missing key is not an error here.
pub fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.max_notes, None);
        assert_eq!(cfg.summarizer.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.summarizer.timeout, Duration::from_secs(30));
    }

    #[test]
    fn yaml_overrides_fields() {
        let yaml = r"
host: 127.0.0.1
port: 8080
max_notes: 1000
summarizer:
  base_url: http://localhost:11434/v1
  model: llama3.2
  timeout: 1m 30s
";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.max_notes, Some(1000));
        assert_eq!(cfg.summarizer.model, "llama3.2");
        assert_eq!(cfg.summarizer.timeout, Duration::from_secs(90));
    }

    #[test]
    fn env_values_overlay_defaults() {
        let vars = vec![
            ("PORT".to_string(), "9000".to_string()),
            ("LLM_MODEL".to_string(), "gpt-4o".to_string()),
            ("LLM_TIMEOUT".to_string(), "10s".to_string()),
        ];
        let env_config: EnvConfig = envy::from_iter(vars).unwrap();
        let cfg = Config::default().overlay(env_config);

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.summarizer.model, "gpt-4o");
        assert_eq!(cfg.summarizer.timeout, Duration::from_secs(10));
        assert_eq!(cfg.summarizer.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn invalid_env_port_is_rejected() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        assert!(envy::from_iter::<_, EnvConfig>(vars).is_err());
    }
}
