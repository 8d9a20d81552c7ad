//! Layered configuration
//!
//! Resolution order, later layers winning key by key:
//! 1. Embedded defaults (`config/pocketwise.toml`, compiled into the binary)
//! 2. Override file (`--config` path, or `~/.config/pocketwise/config.toml`)
//! 3. Environment variables
//!
//! Environment variables:
//! - `POCKETWISE_DATA`: transaction source path
//! - `POCKETWISE_STRICT`: reject invalid records (`true`/`1`)
//! - `HOST`, `PORT`: server bind address
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origin list
//! - `ADVICE_TIMEOUT_SECS`: advice request bound
//! - `AI_BACKEND`: openai, ollama, mock or none
//! - `OPENAI_API_KEY` (or `OPENAI_COMPATIBLE_API_KEY`), `OPENAI_COMPATIBLE_HOST`,
//!   `OPENAI_COMPATIBLE_MODEL`
//! - `OLLAMA_HOST`, `OLLAMA_MODEL`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::ValidationPolicy;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pocketwise.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    pub server: ServerSettings,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataConfig {
    /// Transaction source; `None` selects the embedded sample dataset
    pub path: Option<PathBuf>,
    pub strict: bool,
}

impl DataConfig {
    pub fn policy(&self) -> ValidationPolicy {
        if self.strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub advice_timeout: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            advice_timeout: Duration::from_secs(60),
        }
    }
}

/// Which LLM backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    OpenAI,
    Ollama,
    Mock,
    /// Heuristic advice only
    None,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "openai_compatible" | "vllm" | "localai" | "llamacpp" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            "none" | "off" | "heuristic" => Ok(Self::None),
            other => Err(Error::Config(format!("Unknown LLM backend: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub backend: BackendKind,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub openai: OpenAISettings,
    pub ollama: OllamaSettings,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenAI,
            temperature: 0.7,
            max_tokens: 600,
            system_prompt:
                "You are a professional financial advisor who provides clear, actionable advice."
                    .to_string(),
            openai: OpenAISettings::default(),
            ollama: OllamaSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAISettings {
    pub host: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            host: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub host: Option<String>,
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: None,
            model: "llama3.2".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // The embedded file is covered by tests; fall back to the code defaults if it ever fails
        let mut config = Self {
            data: DataConfig::default(),
            server: ServerSettings::default(),
            llm: LlmConfig::default(),
        };
        if let Err(e) = config.merge_toml(DEFAULT_CONFIG) {
            warn!(error = %e, "Embedded config is invalid, using built-in defaults");
        }
        config
    }
}

impl Config {
    /// Resolve all three layers
    ///
    /// An explicit `path` must exist. Without one, the default override location
    /// is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        match path {
            Some(path) => config.merge_file(path)?,
            None => {
                if let Some(default_path) = default_config_path().filter(|p| p.exists()) {
                    config.merge_file(&default_path)?;
                }
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Overlay keys present in a TOML file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        self.merge_toml(&content)?;
        debug!(path = %path.display(), "Applied config override");
        Ok(())
    }

    /// Overlay keys present in TOML content
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        if let Some(data) = raw.data {
            if let Some(path) = data.path {
                self.data.path = Some(path);
            }
            if let Some(strict) = data.strict {
                self.data.strict = strict;
            }
        }

        if let Some(server) = raw.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                self.server.allowed_origins = origins;
            }
            if let Some(secs) = server.advice_timeout_secs {
                self.server.advice_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(llm) = raw.llm {
            if let Some(backend) = llm.backend {
                self.llm.backend = backend.parse()?;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm.max_tokens = max_tokens;
            }
            if let Some(system_prompt) = llm.system_prompt {
                self.llm.system_prompt = system_prompt;
            }
            if let Some(openai) = llm.openai {
                if let Some(host) = openai.host {
                    self.llm.openai.host = host;
                }
                if let Some(model) = openai.model {
                    self.llm.openai.model = model;
                }
                if let Some(api_key) = openai.api_key {
                    self.llm.openai.api_key = Some(api_key);
                }
            }
            if let Some(ollama) = llm.ollama {
                if let Some(host) = ollama.host {
                    self.llm.ollama.host = Some(host);
                }
                if let Some(model) = ollama.model {
                    self.llm.ollama.model = model;
                }
            }
        }

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("POCKETWISE_DATA") {
            self.data.path = Some(PathBuf::from(path));
        }
        if let Some(strict) = get("POCKETWISE_STRICT") {
            self.data.strict = matches!(strict.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "Ignoring invalid PORT"),
            }
        }
        if let Some(origins) = get("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(secs) = get("ADVICE_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.server.advice_timeout = Duration::from_secs(secs),
                Err(_) => warn!(value = %secs, "Ignoring invalid ADVICE_TIMEOUT_SECS"),
            }
        }

        if let Some(backend) = get("AI_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.llm.backend = kind,
                Err(e) => warn!(error = %e, "Ignoring AI_BACKEND"),
            }
        }
        if let Some(key) = get("OPENAI_API_KEY").or_else(|| get("OPENAI_COMPATIBLE_API_KEY")) {
            self.llm.openai.api_key = Some(key);
        }
        if let Some(host) = get("OPENAI_COMPATIBLE_HOST") {
            self.llm.openai.host = host;
        }
        if let Some(model) = get("OPENAI_COMPATIBLE_MODEL") {
            self.llm.openai.model = model;
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.llm.ollama.host = Some(host);
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.llm.ollama.model = model;
        }
    }
}

/// Default override location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pocketwise").join("config.toml"))
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    data: Option<RawData>,
    server: Option<RawServer>,
    llm: Option<RawLlm>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    path: Option<PathBuf>,
    strict: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
    advice_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawLlm {
    backend: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
    openai: Option<RawOpenAI>,
    ollama: Option<RawOllama>,
}

#[derive(Debug, Deserialize)]
struct RawOpenAI {
    host: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOllama {
    host: Option<String>,
    model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_embedded_config_parses() {
        let mut config = Config {
            data: DataConfig::default(),
            server: ServerSettings::default(),
            llm: LlmConfig::default(),
        };
        config.merge_toml(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.advice_timeout, Duration::from_secs(60));
        assert_eq!(config.llm.backend, BackendKind::OpenAI);
        assert_eq!(config.llm.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 600);
        assert!((config.llm.temperature - 0.7).abs() < 0.001);
        assert!(config.llm.openai.api_key.is_none());
        assert!(config.data.path.is_none());
        assert_eq!(config.data.policy(), ValidationPolicy::Lenient);
    }

    #[test]
    fn test_override_merges_key_by_key() {
        let mut config = Config::default();
        config
            .merge_toml(
                r#"
                [server]
                port = 9000

                [llm]
                backend = "ollama"

                [llm.ollama]
                host = "http://localhost:11434"
                "#,
            )
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.backend, BackendKind::Ollama);
        assert_eq!(
            config.llm.ollama.host.as_deref(),
            Some("http://localhost:11434")
        );
        assert_eq!(config.llm.ollama.model, "llama3.2");
    }

    #[test]
    fn test_invalid_toml() {
        let mut config = Config::default();
        assert!(matches!(
            config.merge_toml("[server\nport = "),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config.merge_toml("[llm]\nbackend = \"gemini\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\nstrict = true\npath = \"txns.csv\"\n").unwrap();

        let mut config = Config::default();
        config.merge_file(&path).unwrap();
        assert_eq!(config.data.policy(), ValidationPolicy::Strict);
        assert_eq!(config.data.path, Some(PathBuf::from("txns.csv")));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            ("PORT", "3001"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("ADVICE_TIMEOUT_SECS", "5"),
            ("OPENAI_API_KEY", "sk-test"),
            ("POCKETWISE_STRICT", "true"),
            ("AI_BACKEND", "mock"),
        ]));

        assert_eq!(config.server.port, 3001);
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.server.advice_timeout, Duration::from_secs(5));
        assert_eq!(config.llm.openai.api_key.as_deref(), Some("sk-test"));
        assert!(config.data.strict);
        assert_eq!(config.llm.backend, BackendKind::Mock);
    }

    #[test]
    fn test_env_invalid_values_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            ("PORT", "not-a-port"),
            ("AI_BACKEND", "gemini"),
            ("OPENAI_API_KEY", "  "),
        ]));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.backend, BackendKind::OpenAI);
        assert!(config.llm.openai.api_key.is_none());
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("OpenAI".parse::<BackendKind>().unwrap(), BackendKind::OpenAI);
        assert_eq!(
            "openai_compatible".parse::<BackendKind>().unwrap(),
            BackendKind::OpenAI
        );
        assert_eq!("none".parse::<BackendKind>().unwrap(), BackendKind::None);
        assert!("bogus".parse::<BackendKind>().is_err());
    }
}
