use crate::hotp::Config;
use std::path::PathBuf;

/// Store locations and validator settings shared by the store-backed commands.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub secrets: Option<PathBuf>,
    pub counters: PathBuf,
    pub config: Config,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(counters: PathBuf) -> Self {
        Self {
            secrets: None,
            counters,
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn with_secrets(mut self, secrets: PathBuf) -> Self {
        self.secrets = Some(secrets);
        self
    }

    #[must_use]
    pub const fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}
