//! Core simulation for Snake
//!
//! This module contains the game logic without any terminal or rendering
//! dependencies. The same tick contract serves keyboard play and
//! autonomous agents; collaborators plug in through the traits in
//! [`traits`].

pub mod action;
pub mod config;
pub mod engine;
pub mod mode;
pub mod observation;
pub mod state;
pub mod traits;

// Re-export commonly used types
pub use action::{Action, ActionError, Direction};
pub use config::GameConfig;
pub use engine::{Pantry, Simulation};
pub use mode::{
    AutonomousControl, CollisionType, ControlMode, HumanControl, ModeKind, Outcome,
    TerminationCause,
};
pub use observation::{OBSERVATION_SIZE, Observation, create_observation};
pub use state::{Board, Body, Cell};
pub use traits::{BoardView, FoodSource, InputSource, NoInput, NullRenderer, Renderer};
