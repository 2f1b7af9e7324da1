//! Autonomous play
//!
//! Runs episodes of an [`Agent`] against the simulation: observe, act, tick,
//! then show the agent the transition. Finished episodes are recorded in
//! [`EpisodeStats`] and the simulation is reset for the next one.
//!
//! # Example
//!
//! ```rust
//! use snake_modes::agent::GreedyAgent;
//! use snake_modes::game::GameConfig;
//! use snake_modes::modes::{AgentConfig, AgentMode};
//!
//! let config = AgentConfig {
//!     episodes: 3,
//!     ..AgentConfig::default()
//! };
//! let mut mode = AgentMode::new(GameConfig::small(), GreedyAgent::new(Some(7)), config)?;
//! mode.run()?;
//! assert_eq!(mode.stats().episodes(), 3);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, ensure};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;

use crate::agent::{Agent, Transition};
use crate::game::{GameConfig, ModeKind, NullRenderer, Outcome, Simulation};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::EpisodeStats;
use crate::render::TerminalRenderer;

/// Settings for an autonomous run
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Tick period when watching in the terminal
    pub tick_interval: Duration,

    /// Where to write the episode statistics as JSON, if anywhere
    pub stats_path: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            tick_interval: Duration::from_millis(50),
            stats_path: None,
        }
    }
}

pub struct AgentMode<A: Agent> {
    simulation: Simulation,
    agent: A,
    stats: EpisodeStats,
    config: AgentConfig,

    /// Reward summed over the running episode
    episode_reward: i64,
    should_quit: bool,
}

impl<A: Agent> AgentMode<A> {
    pub fn new(game_config: GameConfig, agent: A, config: AgentConfig) -> Result<Self> {
        ensure!(!config.tick_interval.is_zero(), "tick interval must be positive");

        let simulation = Simulation::new(game_config, ModeKind::Autonomous)?;

        Ok(Self {
            simulation,
            agent,
            stats: EpisodeStats::new(),
            config,
            episode_reward: 0,
            should_quit: false,
        })
    }

    /// Play every episode without drawing anything
    pub fn run(&mut self) -> Result<()> {
        for _ in 0..self.config.episodes {
            self.run_episode();
        }

        self.save_stats()
    }

    /// Play in the terminal until the episodes run out or the user quits
    pub async fn run_watched(&mut self) -> Result<()> {
        self.simulation.replace_renderer(Box::new(TerminalRenderer::new()?));
        self.simulation.render();

        let result = self.run_watch_loop().await;

        self.simulation.replace_renderer(Box::new(NullRenderer));
        result?;

        self.save_stats()
    }

    async fn run_watch_loop(&mut self) -> Result<()> {
        let input_handler = InputHandler::new();
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.config.tick_interval);

        while self.stats.episodes() < self.config.episodes {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        if key.kind == KeyEventKind::Press
                            && input_handler.handle_key_event(key) == KeyAction::Quit
                        {
                            self.should_quit = true;
                        }
                    }
                }

                _ = tick_timer.tick() => {
                    if self.simulation.is_terminated() {
                        self.finish_episode();
                    } else {
                        self.step();
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Play one episode to the end. Returns its score.
    pub fn run_episode(&mut self) -> u32 {
        while !self.simulation.is_terminated() {
            self.step();
        }
        self.finish_episode()
    }

    /// One observe, act, tick, learn cycle
    pub fn step(&mut self) -> Outcome {
        let observation = self.simulation.observation();
        let action = self.agent.act(&observation);
        let outcome = self.simulation.tick(Some(action));

        let reward = outcome.reward().unwrap_or(0);
        self.episode_reward += i64::from(reward);

        let transition = Transition {
            observation,
            action,
            reward,
            next_observation: self.simulation.observation(),
            terminated: outcome.terminated(),
            score: outcome.score(),
        };
        self.agent.observe(&transition);

        outcome
    }

    fn finish_episode(&mut self) -> u32 {
        let score = self.simulation.score();
        let length = self.simulation.mode().step_count().unwrap_or(0);

        self.stats.record_episode(score, length, self.episode_reward);
        info!(
            "Game {} Score {} High Score {}",
            self.stats.episodes(),
            score,
            self.stats.high_score()
        );

        self.agent.end_episode(score);
        self.episode_reward = 0;
        self.simulation.reset();

        score
    }

    fn save_stats(&self) -> Result<()> {
        if let Some(path) = &self.config.stats_path {
            self.stats
                .save_json(path)
                .with_context(|| format!("Failed to export episode stats to {:?}", path))?;
            info!("episode stats written to {:?}", path);
        }
        Ok(())
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}
