//! Per-episode statistics for autonomous runs
//!
//! Keeps the full score history and its running mean, the two series a
//! training curve is drawn from. Drawing the curve is left to other tools;
//! [`EpisodeStats::save_json`] exports the data.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Score history across episodes
///
/// # Example
///
/// ```rust
/// use snake_modes::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new();
/// stats.record_episode(4, 120, 30);
/// stats.record_episode(2, 80, 10);
///
/// assert_eq!(stats.episodes(), 2);
/// assert_eq!(stats.high_score(), 4);
/// assert_eq!(stats.mean_score(), 3.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Final score of every episode
    scores: Vec<u32>,

    /// Mean score over all episodes so far, one entry per episode
    mean_scores: Vec<f64>,

    /// Ticks per episode
    lengths: Vec<usize>,

    /// Summed reward per episode
    rewards: Vec<i64>,

    total_score: u64,
    high_score: u32,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished episode. Returns true on a new high score.
    pub fn record_episode(&mut self, score: u32, length: usize, reward: i64) -> bool {
        self.scores.push(score);
        self.lengths.push(length);
        self.rewards.push(reward);
        self.total_score += u64::from(score);
        self.mean_scores.push(self.total_score as f64 / self.scores.len() as f64);

        let record = score > self.high_score;
        if record {
            self.high_score = score;
        }
        record
    }

    pub fn episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn mean_scores(&self) -> &[f64] {
        &self.mean_scores
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn last_score(&self) -> Option<u32> {
        self.scores.last().copied()
    }

    /// Mean over every episode, 0.0 before the first
    pub fn mean_score(&self) -> f64 {
        self.mean_scores.last().copied().unwrap_or(0.0)
    }

    /// Mean of the last `window` episodes
    pub fn recent_mean_score(&self, window: usize) -> f64 {
        let start = self.scores.len().saturating_sub(window);
        let recent = &self.scores[start..];
        if recent.is_empty() {
            return 0.0;
        }
        recent.iter().map(|&s| f64::from(s)).sum::<f64>() / recent.len() as f64
    }

    pub fn total_steps(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn mean_reward(&self) -> f64 {
        if self.rewards.is_empty() {
            return 0.0;
        }
        self.rewards.iter().sum::<i64>() as f64 / self.rewards.len() as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "Episodes: {}\nHigh score: {}\nMean score: {:.2}\nMean score (last 100): {:.2}\nMean reward: {:.2}\nTotal steps: {}",
            self.episodes(),
            self.high_score,
            self.mean_score(),
            self.recent_mean_score(100),
            self.mean_reward(),
            self.total_steps(),
        )
    }

    /// Write the history as pretty JSON, creating parent directories
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize stats")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write stats to {:?}", path))?;

        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats from {:?}", path))?;
        serde_json::from_str(&json).context("Failed to deserialize stats")
    }
}
