//! Training configuration.
//!
//! A run is described by a flat set of key/value settings, normally read
//! from a `configurations.json` file. The twelve core keys are required;
//! the remaining ones fall back to defaults. Every configuration is
//! validated before a trainer is built, so a bad value stops the run before
//! the first episode.
//!
//! ```rust
//! use deepq::config::TrainingConfig;
//!
//! let config = TrainingConfig::from_json_str(r#"{
//!     "replay_memory_size": 20000,
//!     "min_replay_memory_size": 1000,
//!     "batch_size": 64,
//!     "update_target_every": 5,
//!     "learning_rate": 0.001,
//!     "hidden_layer_width": 32,
//!     "discount": 0.95,
//!     "epsilon_start": 1.0,
//!     "epsilon_min": 0.01,
//!     "epsilon_decay": 0.01,
//!     "episodes": 500,
//!     "cycles": 2
//! }"#).unwrap();
//! assert_eq!(config.hidden_layers, 2);
//! assert!(!config.double_q_learning);
//! assert_eq!(config.show_every(), 100);
//! ```

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{Error, Result};
use crate::optimizer::OptimizerKind;

fn default_hidden_layers() -> usize {
    2
}

fn default_max_episode_steps() -> usize {
    200
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    /// Capacity of the replay buffer
    pub replay_memory_size: usize,
    /// Transitions to collect before the first gradient step
    pub min_replay_memory_size: usize,
    pub batch_size: usize,
    /// Terminal transitions between target-network synchronizations
    pub update_target_every: usize,
    pub learning_rate: f32,
    pub hidden_layer_width: usize,
    pub discount: f32,
    pub epsilon_start: f32,
    pub epsilon_min: f32,
    /// Linear decrement applied to epsilon after each episode
    pub epsilon_decay: f32,
    /// Episodes per cycle
    pub episodes: usize,
    pub cycles: usize,

    #[serde(default = "default_hidden_layers")]
    pub hidden_layers: usize,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub optimizer: OptimizerKind,
    /// Step cap after which an episode is truncated
    #[serde(default = "default_max_episode_steps")]
    pub max_episode_steps: usize,
    /// Progress report cadence in episodes; defaults to a tenth of the run
    #[serde(default)]
    pub show_every: Option<usize>,
    /// Let the Q-network pick the next action and the target network value it
    #[serde(default)]
    pub double_q_learning: bool,
    /// Seed for every random source of the run; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Episodes between progress reports.
    pub fn show_every(&self) -> usize {
        self.show_every
            .unwrap_or(self.episodes * self.cycles / 10)
            .max(1)
    }

    /// Total episodes over all cycles.
    pub fn total_episodes(&self) -> usize {
        self.episodes * self.cycles
    }

    pub fn validate(&self) -> Result<()> {
        positive("replay_memory_size", self.replay_memory_size)?;
        positive("batch_size", self.batch_size)?;
        positive("update_target_every", self.update_target_every)?;
        positive("hidden_layer_width", self.hidden_layer_width)?;
        positive("hidden_layers", self.hidden_layers)?;
        positive("episodes", self.episodes)?;
        positive("cycles", self.cycles)?;
        positive("max_episode_steps", self.max_episode_steps)?;
        if let Some(show_every) = self.show_every {
            positive("show_every", show_every)?;
        }

        if self.min_replay_memory_size > self.replay_memory_size {
            return Err(invalid(
                "min_replay_memory_size",
                format!(
                    "{} exceeds replay_memory_size {}",
                    self.min_replay_memory_size, self.replay_memory_size
                ),
            ));
        }
        if self.batch_size > self.min_replay_memory_size {
            return Err(invalid(
                "batch_size",
                format!(
                    "{} exceeds min_replay_memory_size {}, so a minibatch could not always be drawn",
                    self.batch_size, self.min_replay_memory_size
                ),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", format!("must be positive, got {}", self.learning_rate)));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(invalid("discount", format!("must lie in [0, 1], got {}", self.discount)));
        }
        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(invalid("epsilon_start", format!("must lie in [0, 1], got {}", self.epsilon_start)));
        }
        if !(0.0..=self.epsilon_start).contains(&self.epsilon_min) {
            return Err(invalid(
                "epsilon_min",
                format!("must lie in [0, epsilon_start], got {}", self.epsilon_min),
            ));
        }
        if !(self.epsilon_decay.is_finite() && self.epsilon_decay >= 0.0) {
            return Err(invalid("epsilon_decay", format!("must be non-negative, got {}", self.epsilon_decay)));
        }
        Ok(())
    }
}

fn positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(invalid(name, "must be greater than 0".to_string()));
    }
    Ok(())
}

fn invalid(name: &str, reason: String) -> Error {
    Error::config(name.to_string(), reason)
}
