use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::Action,
    config::GameConfig,
    mode::{CollisionType, ControlMode, ModeKind, Outcome, TerminationCause},
    observation::{Observation, create_observation},
    state::{Board, Body, Cell},
    traits::{BoardView, FoodSource, InputSource, NoInput, NullRenderer, Renderer},
};

/// Random draws before falling back to scanning the free cells
const PLACEMENT_ATTEMPTS: usize = 256;

/// Owns the food cell and the randomness used to place it
pub struct Pantry {
    board: Board,
    food: Cell,
    rng: StdRng,
}

impl Pantry {
    fn new(board: Board, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            board,
            food: Cell::new(0, 0),
            rng,
        }
    }

    fn random_cell(&mut self) -> Cell {
        let column = self.rng.gen_range(0..self.board.columns());
        let row = self.rng.gen_range(0..self.board.rows());
        self.board.cell_at(column, row)
    }
}

impl FoodSource for Pantry {
    fn food(&self) -> Cell {
        self.food
    }

    /// Uniform over block-aligned cells, rejecting the body
    fn replenish(&mut self, body: &Body) {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidate = self.random_cell();
            if !body.occupies(candidate) {
                self.food = candidate;
                debug!("food placed at ({}, {})", candidate.x, candidate.y);
                return;
            }
        }

        // Crowded board: pick among what is left
        let free: Vec<Cell> = self
            .board
            .cells()
            .filter(|&cell| !body.occupies(cell))
            .collect();

        match free.choose(&mut self.rng) {
            Some(&cell) => {
                self.food = cell;
                debug!("food placed at ({}, {}) after scan", cell.x, cell.y);
            }
            None => warn!("no free cell left for food; the snake fills the board"),
        }
    }
}

/// The game loop driver
///
/// Owns the board, the food and the active control mode. Each call to
/// [`Simulation::tick`] performs one complete, fixed-order state transition.
pub struct Simulation {
    config: GameConfig,
    board: Board,
    mode: ControlMode,
    pantry: Pantry,
    input: Box<dyn InputSource>,
    renderer: Box<dyn Renderer>,
}

impl Simulation {
    /// Create a simulation and start the first episode
    pub fn new(config: GameConfig, kind: ModeKind) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| anyhow!("invalid game config: {reason}"))?;

        let board = Board::from(&config);
        let mut simulation = Self {
            board,
            mode: ControlMode::new(kind, &config),
            pantry: Pantry::new(board, config.seed),
            input: Box::new(NoInput),
            renderer: Box::new(NullRenderer),
            config,
        };
        simulation.reset();

        Ok(simulation)
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Swap the renderer, returning the previous one
    pub fn replace_renderer(&mut self, renderer: Box<dyn Renderer>) -> Box<dyn Renderer> {
        std::mem::replace(&mut self.renderer, renderer)
    }

    /// Advance one tick
    ///
    /// `action` drives autonomous mode and is ignored in human mode.
    /// Once terminated, ticking is a no-op that returns the final outcome
    /// until [`Simulation::reset`].
    ///
    /// # Panics
    ///
    /// Panics in autonomous mode when `action` is `None`.
    pub fn tick(&mut self, action: Option<Action>) -> Outcome {
        if self.mode.is_terminated() {
            return self.mode.outcome();
        }

        self.mode.begin_tick();
        self.mode.set_direction(self.input.as_mut());
        self.mode.move_snake(action);
        self.mode.insert_head();

        let collision = self.collision_check(self.mode.body().head());
        if self.mode.check_termination(collision) {
            self.log_termination();
        }

        self.mode.resolve_food(&mut self.pantry);
        self.render();

        self.mode.outcome()
    }

    /// [`Simulation::tick`] with the action in its one-hot wire form
    ///
    /// # Panics
    ///
    /// Panics when the triple is not one-hot.
    pub fn tick_one_hot(&mut self, triple: Option<[u8; 3]>) -> Outcome {
        self.tick(triple.map(Action::from_one_hot))
    }

    /// Would a head at `cell` end the game?
    ///
    /// Checks the board bounds, then the body behind the head.
    pub fn collision_check(&self, cell: Cell) -> Option<CollisionType> {
        if !self.board.contains(cell) {
            return Some(CollisionType::Wall);
        }

        if self.mode.body().collides_with_body(cell) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Start a new episode
    pub fn reset(&mut self) {
        self.mode.reset(&mut self.pantry);
        debug!("episode reset ({:?} mode)", self.mode.kind());
    }

    /// Draw the current state. Renderer failures are logged and ignored.
    pub fn render(&mut self) {
        let view = BoardView {
            board: self.board,
            body: self.mode.body(),
            food: self.pantry.food,
            score: self.mode.score(),
            terminated: self.mode.is_terminated(),
            kind: self.mode.kind(),
        };

        if let Err(err) = self.renderer.render(&view) {
            warn!("render failed: {err:#}");
        }
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            board: self.board,
            body: self.mode.body(),
            food: self.pantry.food,
            score: self.mode.score(),
            terminated: self.mode.is_terminated(),
            kind: self.mode.kind(),
        }
    }

    /// Feature vector for an external agent
    pub fn observation(&self) -> Observation {
        create_observation(self)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn mode(&self) -> &ControlMode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn body(&self) -> &Body {
        self.mode.body()
    }

    pub fn food(&self) -> Cell {
        self.pantry.food
    }

    pub fn score(&self) -> u32 {
        self.mode.score()
    }

    pub fn is_terminated(&self) -> bool {
        self.mode.is_terminated()
    }

    pub fn outcome(&self) -> Outcome {
        self.mode.outcome()
    }

    fn log_termination(&self) {
        let cause = match self.mode.termination_cause() {
            Some(TerminationCause::Collision(CollisionType::Wall)) => "hit the wall",
            Some(TerminationCause::Collision(CollisionType::SelfCollision)) => "hit itself",
            Some(TerminationCause::Stall) => "stalled",
            None => "ended",
        };
        info!(
            "episode over: snake {} with score {} (length {})",
            cause,
            self.mode.score(),
            self.mode.body().len()
        );
    }

    #[cfg(test)]
    pub(crate) fn place_food_at(&mut self, cell: Cell) {
        self.pantry.food = cell;
    }

    #[cfg(test)]
    pub(crate) fn replace_body(&mut self, body: Body) {
        *self.mode.body_mut() = body;
    }
}
