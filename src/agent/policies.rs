use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Agent;
use crate::game::{Action, Observation};

/// Exploration is on while `rng(0..=200) < EXPLORATION_GAMES - games`
const EXPLORATION_GAMES: i64 = 80;
const EXPLORATION_RANGE: i64 = 200;

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Picks uniformly among the three actions
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _observation: &Observation) -> Action {
        *Action::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Action::Straight)
    }
}

/// Steers toward food while avoiding immediate danger
///
/// Early games are mixed with random moves; the chance shrinks by one step
/// per finished game and vanishes after 80 games.
pub struct GreedyAgent {
    rng: StdRng,
    games: u32,
    explore: bool,
}

impl GreedyAgent {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
            games: 0,
            explore: true,
        }
    }

    /// Never take random moves
    pub fn without_exploration(mut self) -> Self {
        self.explore = false;
        self
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    /// Current exploration threshold out of 200
    pub fn epsilon(&self) -> i64 {
        if self.explore {
            EXPLORATION_GAMES - i64::from(self.games)
        } else {
            0
        }
    }

    /// The greedy choice for an observation
    pub fn plan(observation: &Observation) -> Action {
        let safe: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|&action| !observation.danger(action))
            .collect();

        safe.iter()
            .copied()
            .find(|&action| observation.food_towards(observation.heading.turned(action)))
            .or_else(|| safe.first().copied())
            .unwrap_or(Action::Straight)
    }
}

impl Agent for GreedyAgent {
    fn act(&mut self, observation: &Observation) -> Action {
        if self.rng.gen_range(0..=EXPLORATION_RANGE) < self.epsilon() {
            *Action::ALL
                .choose(&mut self.rng)
                .unwrap_or(&Action::Straight)
        } else {
            Self::plan(observation)
        }
    }

    fn end_episode(&mut self, _score: u32) {
        self.games += 1;
    }
}
