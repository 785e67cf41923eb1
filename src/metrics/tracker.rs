use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;
use super::statistics::Statistics;

/// What the trainer remembers about one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub cycle: usize,
    /// Episode index within its cycle
    pub episode: usize,
    pub total_reward: f32,
    pub steps: usize,
    pub win: bool,
    /// Ended by the step cap rather than by the environment
    pub truncated: bool,
    /// Epsilon in effect while the episode was played
    pub epsilon: f32,
    /// Mean loss of the gradient steps taken during the episode
    pub mean_loss: Option<f32>,
    /// The target network was synchronized during this episode
    pub synchronized: bool,
}

/// Statistics of one training run, accumulated across cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub episodes: Vec<EpisodeRecord>,
    pub synchronizations: usize,
    pub gradient_steps: usize,
    pub total_steps: usize,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, record: EpisodeRecord) {
        self.total_steps += record.steps;
        self.episodes.push(record);
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    pub fn rewards(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.total_reward).collect()
    }

    pub fn epsilons(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.epsilon).collect()
    }

    pub fn wins(&self) -> usize {
        self.episodes.iter().filter(|e| e.win).count()
    }

    /// Fraction of episodes won; zero before the first episode.
    pub fn win_rate(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.wins() as f32 / self.episodes.len() as f32
    }

    /// Reward statistics over the most recent `window` episodes.
    pub fn recent_rewards(&self, window: usize) -> Statistics {
        let start = self.episodes.len().saturating_sub(window);
        let rewards: Vec<f32> = self.episodes[start..].iter().map(|e| e.total_reward).collect();
        Statistics::from_slice(&rewards)
    }

    /// Wins among the most recent `window` episodes.
    pub fn recent_wins(&self, window: usize) -> usize {
        let start = self.episodes.len().saturating_sub(window);
        self.episodes[start..].iter().filter(|e| e.win).count()
    }

    /// Moving average of episode rewards over `window`, one value per full window.
    pub fn moving_average(&self, window: usize) -> Vec<f32> {
        if window == 0 {
            return Vec::new();
        }
        self.rewards()
            .windows(window)
            .map(|w| w.iter().sum::<f32>() / window as f32)
            .collect()
    }

    /// Save statistics to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Load statistics from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
