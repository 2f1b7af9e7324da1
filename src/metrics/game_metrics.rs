use std::time::{Duration, Instant};

use crate::game::BoardView;

/// Session numbers for the terminal header, fed one frame at a time
pub struct GameMetrics {
    episode_started: Instant,
    elapsed: Duration,
    best_score: u32,
    games: u32,
    last_score: Option<u32>,
    in_game: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            episode_started: Instant::now(),
            elapsed: Duration::ZERO,
            best_score: 0,
            games: 0,
            last_score: None,
            in_game: true,
        }
    }

    /// Refresh from a frame. A terminated view closes the running game once;
    /// the next live view opens a new one.
    pub fn track(&mut self, view: &BoardView<'_>) {
        match (self.in_game, view.terminated) {
            (true, true) => {
                self.elapsed = self.episode_started.elapsed();
                self.finish_game(view.score);
            }
            (false, false) => self.start_game(),
            _ => {}
        }

        if self.in_game {
            self.elapsed = self.episode_started.elapsed();
        }
    }

    fn start_game(&mut self) {
        self.episode_started = Instant::now();
        self.elapsed = Duration::ZERO;
        self.in_game = true;
    }

    fn finish_game(&mut self, score: u32) {
        self.in_game = false;
        self.games += 1;
        self.last_score = Some(score);
        self.best_score = self.best_score.max(score);
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Finished games this session
    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time in the running (or last) game as mm:ss
    pub fn clock(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
