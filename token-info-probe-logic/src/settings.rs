use std::time::Duration;

use anyhow::Context;
use config::{Config, ConfigBuilder, File, builder::DefaultState};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Url,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Maximum number of addresses probed at the same time within one invocation.
    pub concurrency: usize,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    // The whole invocation for one batch is abandoned after this interval.
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub probe_timeout: Duration,
}

fn default_rpc_url() -> Url {
    Url::parse("http://127.0.0.1:8545").expect("valid default url")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            probe: Default::default(),
            batch: Default::default(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self { concurrency: 10 }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 150,
            max_concurrent_batches: 4,
            probe_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    pub const SERVICE_NAME: &'static str = "TOKEN_INFO_PROBE";

    /// Loads settings from the file named by `TOKEN_INFO_PROBE__CONFIG` (if set),
    /// overridden by `TOKEN_INFO_PROBE__*` environment variables.
    pub fn build() -> anyhow::Result<Self> {
        let config_path_name = format!("{}__CONFIG", Self::SERVICE_NAME);

        let mut builder = Config::builder();
        if let Ok(config_path) = std::env::var(&config_path_name) {
            builder = builder.add_source(File::with_name(&config_path));
        }
        // the config path variable itself is not a setting
        let env = std::env::vars()
            .filter(|(name, _)| *name != config_path_name)
            .collect();
        // Use `__` so that it would be possible to address keys with underscores in names (e.g. `batch_size`)
        builder = builder.add_source(
            config::Environment::with_prefix(Self::SERVICE_NAME)
                .separator("__")
                .try_parsing(true)
                .source(Some(env)),
        );

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let settings: Self = builder
            .build()?
            .try_deserialize()
            .context("failed to deserialize settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.probe.concurrency == 0 {
            anyhow::bail!("probe.concurrency must be positive");
        }
        if self.batch.batch_size == 0 {
            anyhow::bail!("batch.batch_size must be positive");
        }
        if self.batch.max_concurrent_batches == 0 {
            anyhow::bail!("batch.max_concurrent_batches must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    fn from_toml(content: &str) -> anyhow::Result<Settings> {
        Settings::from_builder(
            Config::builder().add_source(File::from_str(content, FileFormat::Toml)),
        )
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.batch.batch_size, 150);
        assert_eq!(settings.probe.concurrency, 10);
    }

    #[test]
    fn reads_nested_sections() {
        let settings = from_toml(
            r#"
            rpc_url = "https://eth.example.org/rpc"

            [probe]
            concurrency = 3

            [batch]
            batch_size = 20
            probe_timeout = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.rpc_url.as_str(), "https://eth.example.org/rpc");
        assert_eq!(settings.probe.concurrency, 3);
        assert_eq!(
            settings.batch,
            BatchSettings {
                batch_size: 20,
                max_concurrent_batches: 4,
                probe_timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(from_toml("retries = 3").is_err());
        assert!(from_toml("[probe]\ncache = true").is_err());
    }

    #[test]
    fn rejects_zero_limits() {
        assert!(from_toml("[probe]\nconcurrency = 0").is_err());
        assert!(from_toml("[batch]\nbatch_size = 0").is_err());
        assert!(from_toml("[batch]\nmax_concurrent_batches = 0").is_err());
    }
}
