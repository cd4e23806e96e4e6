use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "kb-bot.toml";
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_DOCUMENTS_DIR: &str = "pdf_files";

pub const ENV_TOKEN: &str = "KB_BOT_TOKEN";
pub const ENV_API_BASE: &str = "KB_BOT_API_BASE";
pub const ENV_DOCUMENTS: &str = "KB_BOT_DOCUMENTS";
pub const ENV_CATALOG: &str = "KB_BOT_CATALOG";

/// Runtime settings: TOML file, then environment, then command-line flags.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// Bot API token; only `run` needs it
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub api_base: String,
    pub documents_dir: PathBuf,
    /// Catalog TOML; `None` uses the bundled Homeline catalog
    pub catalog: Option<PathBuf>,
    pub poll_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub error_backoff_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
            catalog: None,
            poll_timeout_secs: 30,
            request_timeout_secs: 35,
            error_backoff_secs: 5,
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("documents_dir", &self.documents_dir)
            .field("catalog", &self.catalog)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("error_backoff_secs", &self.error_backoff_secs)
            .finish()
    }
}

/// Flag values that win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub documents_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

impl BotConfig {
    /// Read `path`, or `kb-bot.toml` in the working directory when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(api_base) = lookup(ENV_API_BASE) {
            self.api_base = api_base;
        }
        if let Some(dir) = lookup(ENV_DOCUMENTS) {
            self.documents_dir = PathBuf::from(dir);
        }
        if let Some(catalog) = lookup(ENV_CATALOG) {
            self.catalog = Some(PathBuf::from(catalog));
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.documents_dir {
            self.documents_dir = dir;
        }
        if let Some(catalog) = overrides.catalog {
            self.catalog = Some(catalog);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            anyhow::bail!("api_base must not be empty");
        }
        if self.request_timeout_secs <= self.poll_timeout_secs {
            anyhow::bail!(
                "request_timeout_secs ({}) must exceed poll_timeout_secs ({})",
                self.request_timeout_secs,
                self.poll_timeout_secs
            );
        }
        Ok(())
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .with_context(|| format!("Bot token missing: set {ENV_TOKEN} or `token` in the config"))
    }
}
