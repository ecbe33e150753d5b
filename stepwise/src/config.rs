//! Run defaults stored in `stepwise.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;
use crate::suite::RunOptions;

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "stepwise.toml";

/// Stepwise configuration (TOML).
///
/// This file is intended to be edited by humans. Missing fields default to a
/// single worker and the fast strategy. CLI flags override anything set here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StepwiseConfig {
    /// Size of the worker pool shared by every unit of a run.
    pub workers: usize,

    /// Execution strategy: `fast` or `chain`.
    pub strategy: Strategy,
}

impl Default for StepwiseConfig {
    fn default() -> Self {
        let options = RunOptions::default();
        Self {
            workers: options.workers,
            strategy: options.strategy,
        }
    }
}

impl StepwiseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow!("workers must be > 0"));
        }
        Ok(())
    }

    /// Run options with CLI overrides applied on top of this config.
    pub fn options(&self, workers: Option<usize>, strategy: Option<Strategy>) -> RunOptions {
        RunOptions {
            workers: workers.unwrap_or(self.workers),
            strategy: strategy.unwrap_or(self.strategy),
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `StepwiseConfig::default()`.
pub fn load_config(path: &Path) -> Result<StepwiseConfig> {
    if !path.exists() {
        let cfg = StepwiseConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: StepwiseConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &StepwiseConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
