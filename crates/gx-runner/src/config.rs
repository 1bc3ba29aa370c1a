use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

/// Environment variable naming the executor's data root.
pub const DATA_DIR_ENV: &str = "RUNNER_DATADIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Root holding the checked-out repository under `repo/`.
    pub data_dir: PathBuf,
}

impl RunnerConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .with_context(|| format!("{DATA_DIR_ENV} is not set"))?;
        info!("{DATA_DIR_ENV}=\"{data_dir}\"");
        Ok(Self::new(data_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_reads_data_dir() {
        std::env::set_var(DATA_DIR_ENV, "/tmp/gx-data");
        let config = RunnerConfig::from_env().unwrap();
        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/gx-data"));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_variable() {
        std::env::remove_var(DATA_DIR_ENV);
        let err = RunnerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(DATA_DIR_ENV));
    }
}
