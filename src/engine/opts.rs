use std::path::Path;

use anyhow::Context;

use crate::effects::DEFAULT_EFFECT;
use crate::foundation::error::{DisruptError, DisruptResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// How progress is reported to looping instances once a pass has completed.
pub enum LoopProgress {
    /// Progress keeps growing past 1 (`elapsed / runtime`).
    ///
    /// Every built-in effect draws the plain source once progress reaches 1, so a looping
    /// target settles after its first pass. For `dsrpt-rgb-shift` this means the glitch stops
    /// after 2.5 s; pick [`LoopProgress::Wrap`] to keep it glitching.
    #[default]
    Unbounded,
    /// Progress restarts at 0 after every pass (`(elapsed / runtime) mod 1`), so looping
    /// targets replay their effect forever.
    Wrap,
}

impl LoopProgress {
    /// Progress handed to `animate` for a raw `elapsed / runtime` value.
    pub fn apply(self, raw: f64, looping: bool) -> f64 {
        match self {
            Self::Wrap if looping => raw.rem_euclid(1.0),
            _ => raw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Engine configuration.
///
/// Every field has a default, so `{}` is a valid options document.
pub struct EngineOpts {
    /// Root seed; each instance derives its own stream from this and its id.
    pub seed: u64,
    /// Class tag marking an element as a disruption target.
    pub target_tag: String,
    /// Class tag that makes a target loop forever.
    pub loop_tag: String,
    /// Effect used when a target names no registered effect.
    pub default_effect: String,
    /// Progress policy for looping instances.
    pub loop_progress: LoopProgress,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            seed: 0,
            target_tag: "disrupt".to_owned(),
            loop_tag: "loop".to_owned(),
            default_effect: DEFAULT_EFFECT.to_owned(),
            loop_progress: LoopProgress::Unbounded,
        }
    }
}

impl EngineOpts {
    /// Read options from a JSON file and validate them.
    pub fn from_path(path: &Path) -> DisruptResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read engine options '{}'", path.display()))?;
        let opts: Self = serde_json::from_slice(&bytes)
            .map_err(|e| DisruptError::serde(format!("{}: {e}", path.display())))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check that tags and the default effect id are usable.
    pub fn validate(&self) -> DisruptResult<()> {
        for (field, value) in [
            ("target_tag", &self.target_tag),
            ("loop_tag", &self.loop_tag),
            ("default_effect", &self.default_effect),
        ] {
            if value.trim().is_empty() {
                return Err(DisruptError::validation(format!(
                    "{field} must be non-empty"
                )));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(DisruptError::validation(format!(
                    "{field} must be a single class tag, got '{value}'"
                )));
            }
        }
        if self.target_tag == self.loop_tag {
            return Err(DisruptError::validation(
                "target_tag and loop_tag must differ",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/opts.rs"]
mod tests;
