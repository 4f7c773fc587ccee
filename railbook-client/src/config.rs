use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub wizard: WizardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Base path all collaborator endpoints hang off, e.g.
    /// `http://localhost:8080/api`.
    pub base_url: String,

    /// Per-request timeout; expiry surfaces as a transport failure.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WizardConfig {
    /// Clear the draft when returning to the first step instead of
    /// resuming prior selections.
    #[serde(default)]
    pub reset_draft_on_home: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAILBOOK_BACKEND__BASE_URL=...` overrides `backend.base_url`
            .add_source(config::Environment::with_prefix("RAILBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
