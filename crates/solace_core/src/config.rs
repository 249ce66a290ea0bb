use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolaceConfig {
    pub llm: LlmConfig,
    pub engine: EngineConfig,
    pub gateway: GatewayConfig,
}

impl SolaceConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: SolaceConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, use defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("LLM_PROVIDER") {
            self.llm.provider = v;
        }
        if let Ok(v) = std::env::var("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("LLM_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(v) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(n) = v.parse() {
                self.llm.temperature = n;
            }
        }
        if let Ok(v) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                self.llm.timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("SOLACE_PERSONA") {
            self.engine.persona_name = v;
        }
        if let Ok(v) = std::env::var("SOLACE_CATALOGUE") {
            self.engine.catalogue_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("GATEWAY_HOST") {
            self.gateway.host = v;
        }
        if let Ok(v) = std::env::var("GATEWAY_PORT") {
            if let Ok(n) = v.parse() {
                self.gateway.port = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// gemini | anthropic | openai | mock | none
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on one backend call before the local reply is used.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            max_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub persona_name: String,
    /// Replacement for the built-in catalogue.
    pub catalogue_path: Option<PathBuf>,
    /// Answer at-risk turns with the fixed crisis script instead of the backend.
    pub crisis_bypasses_backend: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persona_name: "Solace".to_string(),
            catalogue_path: None,
            crisis_bypasses_backend: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            request_timeout_secs: 60,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = SolaceConfig::default();
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.max_tokens, 1024);
        assert_eq!(cfg.engine.persona_name, "Solace");
        assert!(cfg.engine.crisis_bypasses_backend);
        assert_eq!(cfg.gateway.port, 8787);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[llm]
provider = "anthropic"
model = "claude-sonnet-4-5"
"#;
        let cfg: SolaceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.llm.provider, "anthropic");
        assert_eq!(cfg.llm.model, "claude-sonnet-4-5");
        // Defaults for unspecified fields
        assert_eq!(cfg.llm.timeout_secs, 20);
        assert!(cfg.engine.catalogue_path.is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
base_url = "http://localhost:11434/v1"
max_tokens = 512
temperature = 0.4
timeout_secs = 5

[engine]
persona_name = "Avery"
catalogue_path = "data/catalogue.toml"
crisis_bypasses_backend = false

[gateway]
host = "0.0.0.0"
port = 9000
request_timeout_secs = 30
"#;
        let cfg: SolaceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert_eq!(cfg.llm.timeout_secs, 5);
        assert_eq!(cfg.engine.persona_name, "Avery");
        assert_eq!(
            cfg.engine.catalogue_path,
            Some(PathBuf::from("data/catalogue.toml"))
        );
        assert!(!cfg.engine.crisis_bypasses_backend);
        assert_eq!(cfg.gateway.host, "0.0.0.0");
        assert_eq!(cfg.gateway.port, 9000);
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("LLM_PROVIDER", "mock");
        std::env::set_var("GATEWAY_PORT", "9100");
        std::env::set_var("SOLACE_PERSONA", "Rowan");

        let mut cfg = SolaceConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.llm.provider, "mock");
        assert_eq!(cfg.gateway.port, 9100);
        assert_eq!(cfg.engine.persona_name, "Rowan");

        // Clean up env vars before testing defaults
        std::env::remove_var("LLM_PROVIDER");
        std::env::remove_var("GATEWAY_PORT");
        std::env::remove_var("SOLACE_PERSONA");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = SolaceConfig::load_or_default("/nonexistent/path.toml");
        assert_eq!(cfg.llm.provider, "gemini");
    }
}
