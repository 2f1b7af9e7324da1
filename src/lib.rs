//! Snake - a block-grid snake simulation with two ways to play
//!
//! This library provides:
//! - The simulation core and its tick contract (game module)
//! - The agent contract and reference policies (agent module)
//! - Terminal rendering (render module) and keyboard input (input module)
//! - Session and per-episode statistics (metrics module)
//! - Runnable human and autonomous modes (modes module)

pub mod agent;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
