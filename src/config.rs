use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    foundation::error::{InkError, InkResult},
    geometry::resize::ResampleFilter,
    pipeline::PipelineOptions,
};

/// Engine configuration, built once at startup and passed into constructors.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InkConfig {
    /// SQLite index holding sources, artifacts and the rotation.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory for rendered PNGs and exported plane files.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Resampling kernel name; unsupported names mean nearest-neighbor.
    #[serde(default = "default_resample_filter")]
    pub resample_filter: String,
    /// Serpentine traversal for error-diffusion kernels.
    #[serde(default)]
    pub serpentine: bool,
    /// How long a caller waits on another caller's in-flight build.
    #[serde(default = "default_build_wait_timeout_ms")]
    pub build_wait_timeout_ms: u64,
    /// Fixed seed for rotation placement. Unset means OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_seed: Option<u64>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("inkframe.db")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_resample_filter() -> String {
    ResampleFilter::Lanczos.name().to_string()
}

fn default_build_wait_timeout_ms() -> u64 {
    30_000
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            cache_dir: default_cache_dir(),
            resample_filter: default_resample_filter(),
            serpentine: false,
            build_wait_timeout_ms: default_build_wait_timeout_ms(),
            rotation_seed: None,
        }
    }
}

impl InkConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> InkResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings no default can stand in for.
    pub fn validate(&self) -> InkResult<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(InkError::config("cache_dir must be non-empty"));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(InkError::config("database_path must be non-empty"));
        }
        if self.build_wait_timeout_ms == 0 {
            return Err(InkError::config("build_wait_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// [`InkConfig::build_wait_timeout_ms`] as a [`Duration`].
    pub fn build_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.build_wait_timeout_ms)
    }

    /// Pipeline switches derived from this config.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            filter: ResampleFilter::from_name(&self.resample_filter),
            serpentine: self.serpentine,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
