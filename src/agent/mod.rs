//! The autonomous side of the tick contract
//!
//! An [`Agent`] reads the [`Observation`] exposed after each tick, answers
//! with a relative [`Action`], and is shown the resulting [`Transition`].
//! Learning algorithms live outside this crate; the policies here are
//! simple references that exercise the contract.

pub mod policies;

pub use policies::{GreedyAgent, RandomAgent};

use crate::game::{Action, Observation};

/// One step of experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub observation: Observation,
    pub action: Action,
    pub reward: i32,
    pub next_observation: Observation,
    pub terminated: bool,
    pub score: u32,
}

/// A policy driving the snake in autonomous mode
pub trait Agent {
    /// Choose the next action
    fn act(&mut self, observation: &Observation) -> Action;

    /// See the result of the last action
    fn observe(&mut self, _transition: &Transition) {}

    /// Called once per finished episode, before the simulation resets
    fn end_episode(&mut self, _score: u32) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn act(&mut self, observation: &Observation) -> Action {
        (**self).act(observation)
    }

    fn observe(&mut self, transition: &Transition) {
        (**self).observe(transition)
    }

    fn end_episode(&mut self, score: u32) {
        (**self).end_episode(score)
    }
}
