use crate::error::{ProvisionerError, Result};
use crate::paths::home;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://api.foojay.io/disco/v3.0";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const ENV_PREFIX: &str = "JAVA_PROVISIONER";

pub const GRADLE_FROM_ENV_VAR: &str = "ORG_GRADLE_JAVA_INSTALLATIONS_FROMENV";
pub const GRADLE_PATHS_VAR: &str = "ORG_GRADLE_JAVA_INSTALLATIONS_PATHS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Managed JDK cache; `<home>/jdks` when unset.
    pub cache_dir: Option<PathBuf>,
    pub offline: bool,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_distribution: Option<String>,
    pub gradle: GradleConfig,

    #[serde(skip)]
    home: PathBuf,
}

/// Gradle toolchain settings consulted by the Gradle locator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradleConfig {
    /// Comma-separated environment variable names (`org.gradle.java.installations.fromEnv`).
    pub installations_from_env: Option<String>,
    /// Comma-separated directories (`org.gradle.java.installations.paths`).
    pub installations_paths: Option<String>,
    pub user_home: Option<PathBuf>,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_distribution: None,
            gradle: GradleConfig::default(),
            home: PathBuf::new(),
        }
    }
}

impl ProvisionerConfig {
    /// Load `<home>/config.toml` (optional) overlaid with `JAVA_PROVISIONER_*`
    /// environment variables. Nested keys use `__`, e.g.
    /// `JAVA_PROVISIONER_GRADLE__USER_HOME`.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = home::config_file(home);
        log::debug!("Loading config from {config_path:?}");

        let settings = config::Config::builder()
            .add_source(
                config::File::new(&config_path.to_string_lossy(), config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ProvisionerError::ConfigError(format!("Failed to load config: {e}")))?;

        let mut loaded: ProvisionerConfig = settings
            .try_deserialize()
            .map_err(|e| ProvisionerError::ConfigError(format!("Invalid config: {e}")))?;
        loaded.home = home.to_path_buf();
        Ok(loaded)
    }

    /// Load from the resolved provisioner home.
    pub fn from_environment() -> Result<Self> {
        Self::load(&home::resolve_home()?)
    }

    /// Defaults rooted at `home`, ignoring config files and the environment.
    pub fn with_home(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn jdk_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| home::jdks_dir(&self.home))
    }

    pub fn gradle_installations_from_env(&self) -> Option<String> {
        self.gradle
            .installations_from_env
            .clone()
            .or_else(|| env::var(GRADLE_FROM_ENV_VAR).ok())
    }

    pub fn gradle_installations_paths(&self) -> Option<String> {
        self.gradle
            .installations_paths
            .clone()
            .or_else(|| env::var(GRADLE_PATHS_VAR).ok())
    }
}
