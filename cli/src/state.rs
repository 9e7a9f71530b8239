//! Progress that survives an interrupted run.

use anyhow::{Context, Result};
use joblens_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Counters persisted between runs of the same job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    /// Records delivered so far; counts toward the result cap on resume
    pub scraped: usize,
    /// Delivery failures encountered
    pub failed: usize,
    /// When the state was last written
    pub updated_at: Option<Timestamp>,
}

impl RunState {
    /// Load state from `path`, starting fresh if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No run state at {}, starting fresh", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run state {}", path.display()))?;
        let state: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid run state {}", path.display()))?;

        tracing::info!(
            "Resuming from run state: scraped={}, failed={}",
            state.scraped,
            state.failed
        );
        Ok(state)
    }

    /// Write state to `path`, replacing the previous file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.updated_at = Some(Timestamp::now());

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write run state {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace run state {}", path.display()))?;
        Ok(())
    }
}
