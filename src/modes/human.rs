use anyhow::{Result, ensure};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use std::time::Duration;
use tokio::time::interval;

use crate::game::{GameConfig, ModeKind, NullRenderer, Simulation};
use crate::input::{InputHandler, KeyAction, PendingDirection};
use crate::render::TerminalRenderer;

/// Default tick period, 8 Hz
pub const DEFAULT_TICK: Duration = Duration::from_millis(125);

/// Keyboard play in the terminal
pub struct HumanMode {
    simulation: Simulation,
    input_handler: InputHandler,
    pending: PendingDirection,
    should_quit: bool,
    tick_interval: Duration,
}

impl HumanMode {
    pub fn new(config: GameConfig, tick_interval: Duration) -> Result<Self> {
        ensure!(!tick_interval.is_zero(), "tick interval must be positive");

        let pending = PendingDirection::new();
        let simulation = Simulation::new(config, ModeKind::Human)?.with_input(pending.clone());

        Ok(Self {
            simulation,
            input_handler: InputHandler::new(),
            pending,
            should_quit: false,
            tick_interval,
        })
    }

    /// Play until the user quits. Returns the score of the last game.
    pub async fn run(&mut self) -> Result<u32> {
        self.simulation.replace_renderer(Box::new(TerminalRenderer::new()?));
        self.simulation.render();

        let result = self.run_game_loop().await;

        // Dropping the terminal renderer restores the screen
        self.simulation.replace_renderer(Box::new(NullRenderer));

        result.map(|()| self.simulation.score())
    }

    async fn run_game_loop(&mut self) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);

        // Keeps the clock in the header moving between ticks and after game over
        let mut render_timer = interval(Duration::from_millis(250));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.simulation.is_terminated() {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    self.simulation.render();
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

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.pending.set(direction),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn update_game(&mut self) {
        let outcome = self.simulation.tick(None);
        if outcome.terminated() {
            info!("game over, press R to play again");
        }
    }

    fn reset_game(&mut self) {
        self.simulation.reset();
        self.pending.clear();
        self.simulation.render();
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}
