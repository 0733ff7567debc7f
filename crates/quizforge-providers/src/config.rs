//! Configuration file and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::traits::{HintProvider, QuizGenerator};

use crate::gemini::{GeminiProvider, DEFAULT_GENERATION_MODEL, DEFAULT_HINT_MODEL};
use crate::mock::MockProvider;
use crate::retry::RetryPolicy;

/// Environment variable that overrides the Gemini API key.
pub const GEMINI_KEY_ENV: &str = "QUIZFORGE_GEMINI_KEY";

/// Configuration for a single provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Offline provider producing synthetic quizzes.
    Mock {
        #[serde(default)]
        fail_generation: bool,
        #[serde(default)]
        hint: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock {
                fail_generation,
                hint,
            } => f
                .debug_struct("Mock")
                .field("fail_generation", fail_generation)
                .field("hint", hint)
                .finish(),
        }
    }
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is named on the command line.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model that writes quizzes.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
    /// Model that answers hint requests.
    #[serde(default = "default_hint_model")]
    pub hint_model: String,
    /// Where the library and settings are stored.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_generation_model() -> String {
    DEFAULT_GENERATION_MODEL.to_string()
}
fn default_hint_model() -> String {
    DEFAULT_HINT_MODEL.to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizforge-data")
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            generation_model: default_generation_model(),
            hint_model: default_hint_model(),
            data_dir: default_data_dir(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl QuizforgeConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    fn provider(&self, name: &str) -> Result<&ProviderConfig> {
        self.providers.get(name).with_context(|| {
            let mut known: Vec<&str> = self.providers.keys().map(String::as_str).collect();
            known.sort_unstable();
            if known.is_empty() {
                format!(
                    "provider '{name}' is not configured (run `quizforge init` or set {GEMINI_KEY_ENV})"
                )
            } else {
                format!(
                    "provider '{name}' is not configured (available: {})",
                    known.join(", ")
                )
            }
        })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        from = start + value.len();
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        mock @ ProviderConfig::Mock { .. } => mock.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// `QUIZFORGE_GEMINI_KEY` overrides (or supplies) the `gemini` provider key.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizforge.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizforgeConfig::default(),
    };

    if let Ok(key) = std::env::var(GEMINI_KEY_ENV) {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Both capabilities of one configured provider.
pub struct Provider {
    pub generator: Arc<dyn QuizGenerator>,
    pub hints: Arc<dyn HintProvider>,
}

/// Create the named provider from configuration.
pub fn create_provider(config: &QuizforgeConfig, name: &str) -> Result<Provider> {
    match config.provider(name)? {
        ProviderConfig::Gemini { api_key, base_url } => {
            if api_key.trim().is_empty() {
                anyhow::bail!("no API key for provider '{name}' (set {GEMINI_KEY_ENV})");
            }
            let gemini = Arc::new(GeminiProvider::new(
                api_key,
                base_url.clone(),
                &config.generation_model,
                &config.hint_model,
            )?);
            Ok(Provider {
                generator: gemini.clone(),
                hints: gemini,
            })
        }
        ProviderConfig::Mock {
            fail_generation,
            hint,
        } => {
            let mut mock = if *fail_generation {
                MockProvider::always_failing()
            } else {
                MockProvider::new()
            };
            if let Some(hint) = hint {
                mock = mock.with_hint(hint.clone());
            }
            let mock = Arc::new(mock);
            Ok(Provider {
                generator: mock.clone(),
                hints: mock,
            })
        }
    }
}

/// Starter configuration written by `quizforge init`.
pub const STARTER_CONFIG: &str = r#"# quizforge configuration

default_provider = "gemini"
generation_model = "gemini-2.5-pro"
hint_model = "gemini-2.5-flash"
data_dir = "./quizforge-data"
max_retries = 3

[providers.gemini]
type = "gemini"
api_key = "${QUIZFORGE_GEMINI_KEY}"

# Offline provider for trying things out:
# [providers.mock]
# type = "mock"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_QUIZFORGE_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no ${ closing"), "no ${ closing");
        std::env::remove_var("_QUIZFORGE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizforgeConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.generation_model, "gemini-2.5-pro");
        assert_eq!(config.hint_model, "gemini-2.5-flash");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "mock"
data_dir = "/tmp/quizzes"

[providers.gemini]
type = "gemini"
api_key = "key-test"

[providers.mock]
type = "mock"
fail_generation = true
"#;
        let config: QuizforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/quizzes"));
        assert!(matches!(
            config.providers.get("mock"),
            Some(ProviderConfig::Mock {
                fail_generation: true,
                ..
            })
        ));
    }

    #[test]
    fn starter_config_parses() {
        let config: QuizforgeConfig = toml::from_str(STARTER_CONFIG).unwrap();
        assert!(matches!(
            config.providers.get("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizforge.toml");
        std::fs::write(&path, "[providers.mock]\ntype = \"mock\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(config.providers.contains_key("mock"));
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn factory_checks_names_and_keys() {
        let mut config = QuizforgeConfig::default();
        assert!(create_provider(&config, "gemini").is_err());

        config.providers.insert(
            "gemini".into(),
            ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            },
        );
        let err = create_provider(&config, "gemini").err().unwrap();
        assert!(err.to_string().contains("no API key"));

        config.providers.insert(
            "mock".into(),
            ProviderConfig::Mock {
                fail_generation: false,
                hint: None,
            },
        );
        let provider = create_provider(&config, "mock").unwrap();
        assert_eq!(provider.generator.name(), "mock");
        let err = create_provider(&config, "other").err().unwrap();
        assert!(err.to_string().contains("available: gemini, mock"));
    }
}
