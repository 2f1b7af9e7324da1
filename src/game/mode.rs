//! Control modes: who steers the snake and how a tick is scored
//!
//! Both variants follow the same per-tick contract so the driver never
//! needs to know which one is active:
//! `set_direction` → `move_snake` → `insert_head` → `check_termination`
//! → `resolve_food` → `outcome`.

use super::action::Action;
use super::config::GameConfig;
use super::state::{Board, Body};
use super::traits::{FoodSource, InputSource};

/// Which policy drives the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Human,
    Autonomous,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    Collision(CollisionType),
    /// Autonomous episode ran too long without growing
    Stall,
}

/// What a tick reports back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Human {
        terminated: bool,
        score: u32,
    },
    Autonomous {
        reward: i32,
        terminated: bool,
        score: u32,
    },
}

impl Outcome {
    pub fn terminated(&self) -> bool {
        match *self {
            Outcome::Human { terminated, .. } | Outcome::Autonomous { terminated, .. } => {
                terminated
            }
        }
    }

    pub fn score(&self) -> u32 {
        match *self {
            Outcome::Human { score, .. } | Outcome::Autonomous { score, .. } => score,
        }
    }

    /// Reward of the tick; `None` in human mode
    pub fn reward(&self) -> Option<i32> {
        match *self {
            Outcome::Human { .. } => None,
            Outcome::Autonomous { reward, .. } => Some(reward),
        }
    }
}

/// Keyboard-driven control
#[derive(Debug, Clone)]
pub struct HumanControl {
    board: Board,
    initial_length: usize,
    body: Body,
    score: u32,
    terminated: bool,
    cause: Option<TerminationCause>,
}

impl HumanControl {
    pub fn new(config: &GameConfig) -> Self {
        let board = Board::from(config);
        Self {
            board,
            initial_length: config.initial_length,
            body: Body::new(&board, config.initial_length),
            score: 0,
            terminated: false,
            cause: None,
        }
    }

    /// Apply one pending heading from the input source
    fn set_direction(&mut self, input: &mut dyn InputSource) {
        if let Some(direction) = input.next_direction() {
            self.body.set_heading(direction);
        }
    }

    fn move_snake(&mut self) {
        self.body.advance();
    }

    fn check_termination(&mut self, collision: Option<CollisionType>) -> bool {
        if !self.terminated {
            if let Some(collision) = collision {
                self.terminated = true;
                self.cause = Some(TerminationCause::Collision(collision));
            }
        }
        self.terminated
    }

    fn resolve_food(&mut self, food: &mut dyn FoodSource) -> bool {
        eat_or_shrink(&mut self.body, &mut self.score, food)
    }

    fn outcome(&self) -> Outcome {
        Outcome::Human {
            terminated: self.terminated,
            score: self.score,
        }
    }

    fn reset(&mut self, food: &mut dyn FoodSource) {
        self.body = Body::new(&self.board, self.initial_length);
        self.score = 0;
        self.terminated = false;
        self.cause = None;
        food.replenish(&self.body);
    }
}

/// Agent-driven control with reward bookkeeping
#[derive(Debug, Clone)]
pub struct AutonomousControl {
    board: Board,
    initial_length: usize,
    body: Body,
    score: u32,
    terminated: bool,
    cause: Option<TerminationCause>,
    reward: i32,
    step_count: usize,
    /// Body length when the current tick began, before the new head
    tick_length: usize,
    stall_factor: usize,
    food_reward: i32,
    death_penalty: i32,
}

impl AutonomousControl {
    pub fn new(config: &GameConfig) -> Self {
        let board = Board::from(config);
        Self {
            board,
            initial_length: config.initial_length,
            body: Body::new(&board, config.initial_length),
            score: 0,
            terminated: false,
            cause: None,
            reward: 0,
            step_count: 0,
            tick_length: config.initial_length,
            stall_factor: config.stall_factor as usize,
            food_reward: config.food_reward,
            death_penalty: config.death_penalty,
        }
    }

    fn begin_tick(&mut self) {
        self.reward = 0;
        self.step_count += 1;
        self.tick_length = self.body.len();
    }

    fn move_snake(&mut self, action: Action) {
        self.body.advance_with(action);
    }

    fn stalled(&self) -> bool {
        self.step_count > self.stall_factor * self.tick_length
    }

    fn check_termination(&mut self, collision: Option<CollisionType>) -> bool {
        if !self.terminated {
            let cause = match collision {
                Some(collision) => Some(TerminationCause::Collision(collision)),
                None if self.stalled() => Some(TerminationCause::Stall),
                None => None,
            };

            if let Some(cause) = cause {
                self.terminated = true;
                self.cause = Some(cause);
                self.reward = self.death_penalty;
            }
        }
        self.terminated
    }

    fn resolve_food(&mut self, food: &mut dyn FoodSource) -> bool {
        let ate = eat_or_shrink(&mut self.body, &mut self.score, food);
        if ate {
            self.reward = self.food_reward;
        }
        ate
    }

    fn outcome(&self) -> Outcome {
        Outcome::Autonomous {
            reward: self.reward,
            terminated: self.terminated,
            score: self.score,
        }
    }

    fn reset(&mut self, food: &mut dyn FoodSource) {
        self.body = Body::new(&self.board, self.initial_length);
        self.score = 0;
        self.terminated = false;
        self.cause = None;
        self.reward = 0;
        self.step_count = 0;
        self.tick_length = self.initial_length;
        food.replenish(&self.body);
    }
}

/// Score and re-place food if the head is on it, otherwise drop the tail.
/// Returns whether food was eaten.
fn eat_or_shrink(body: &mut Body, score: &mut u32, food: &mut dyn FoodSource) -> bool {
    if body.head() == food.food() {
        *score += 1;
        food.replenish(body);
        true
    } else {
        body.pop_tail();
        false
    }
}

/// The active control mode, one per episode
#[derive(Debug, Clone)]
pub enum ControlMode {
    Human(HumanControl),
    Autonomous(AutonomousControl),
}

impl ControlMode {
    /// Build the control mode for `kind`
    pub fn new(kind: ModeKind, config: &GameConfig) -> Self {
        match kind {
            ModeKind::Human => ControlMode::Human(HumanControl::new(config)),
            ModeKind::Autonomous => ControlMode::Autonomous(AutonomousControl::new(config)),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            ControlMode::Human(_) => ModeKind::Human,
            ControlMode::Autonomous(_) => ModeKind::Autonomous,
        }
    }

    /// Per-tick bookkeeping: clears the reward and counts the step
    pub fn begin_tick(&mut self) {
        if let ControlMode::Autonomous(control) = self {
            control.begin_tick();
        }
    }

    /// Human mode pulls a heading from `input`; autonomous mode ignores it
    pub fn set_direction(&mut self, input: &mut dyn InputSource) {
        if let ControlMode::Human(control) = self {
            control.set_direction(input);
        }
    }

    /// Compute the next head. Human mode ignores `action`.
    ///
    /// # Panics
    ///
    /// Panics in autonomous mode when `action` is `None`.
    pub fn move_snake(&mut self, action: Option<Action>) {
        match self {
            ControlMode::Human(control) => control.move_snake(),
            ControlMode::Autonomous(control) => match action {
                Some(action) => control.move_snake(action),
                None => panic!("autonomous mode needs an action every tick"),
            },
        }
    }

    pub fn insert_head(&mut self) {
        self.body_mut().insert_head();
    }

    /// Fold this tick's collision (and, for agents, the stall rule) into the
    /// termination flag. Returns the flag.
    pub fn check_termination(&mut self, collision: Option<CollisionType>) -> bool {
        match self {
            ControlMode::Human(control) => control.check_termination(collision),
            ControlMode::Autonomous(control) => control.check_termination(collision),
        }
    }

    /// Eat or shrink. Returns whether food was eaten.
    pub fn resolve_food(&mut self, food: &mut dyn FoodSource) -> bool {
        match self {
            ControlMode::Human(control) => control.resolve_food(food),
            ControlMode::Autonomous(control) => control.resolve_food(food),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ControlMode::Human(control) => control.outcome(),
            ControlMode::Autonomous(control) => control.outcome(),
        }
    }

    /// Start a new episode and place the first food
    pub fn reset(&mut self, food: &mut dyn FoodSource) {
        match self {
            ControlMode::Human(control) => control.reset(food),
            ControlMode::Autonomous(control) => control.reset(food),
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            ControlMode::Human(control) => &control.body,
            ControlMode::Autonomous(control) => &control.body,
        }
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        match self {
            ControlMode::Human(control) => &mut control.body,
            ControlMode::Autonomous(control) => &mut control.body,
        }
    }

    pub fn score(&self) -> u32 {
        self.outcome().score()
    }

    pub fn is_terminated(&self) -> bool {
        self.outcome().terminated()
    }

    pub fn termination_cause(&self) -> Option<TerminationCause> {
        match self {
            ControlMode::Human(control) => control.cause,
            ControlMode::Autonomous(control) => control.cause,
        }
    }

    /// Current reward; `None` in human mode
    pub fn reward(&self) -> Option<i32> {
        self.outcome().reward()
    }

    /// Steps taken this episode; `None` in human mode
    pub fn step_count(&self) -> Option<usize> {
        match self {
            ControlMode::Human(_) => None,
            ControlMode::Autonomous(control) => Some(control.step_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use crate::game::state::Cell;

    /// Food that stays put unless replenished, counting replenishments
    struct FixedFood {
        cell: Cell,
        next: Cell,
        replenished: usize,
    }

    impl FixedFood {
        fn at(cell: Cell) -> Self {
            Self {
                cell,
                next: Cell::new(0, 0),
                replenished: 0,
            }
        }
    }

    impl FoodSource for FixedFood {
        fn food(&self) -> Cell {
            self.cell
        }

        fn replenish(&mut self, _body: &Body) {
            self.cell = self.next;
            self.replenished += 1;
        }
    }

    struct OneShot(Option<Direction>);

    impl InputSource for OneShot {
        fn next_direction(&mut self) -> Option<Direction> {
            self.0.take()
        }
    }

    #[test]
    fn test_factory_selects_variant() {
        let config = GameConfig::default();
        assert_eq!(
            ControlMode::new(ModeKind::Human, &config).kind(),
            ModeKind::Human
        );
        assert_eq!(
            ControlMode::new(ModeKind::Autonomous, &config).kind(),
            ModeKind::Autonomous
        );
    }

    #[test]
    fn test_human_outcome_has_no_reward() {
        let mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        assert_eq!(
            mode.outcome(),
            Outcome::Human {
                terminated: false,
                score: 0
            }
        );
        assert_eq!(mode.reward(), None);
        assert_eq!(mode.step_count(), None);
    }

    #[test]
    fn test_human_set_direction_reads_input() {
        let mut mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        let mut input = OneShot(Some(Direction::Up));

        mode.set_direction(&mut input);
        assert_eq!(mode.body().heading(), Direction::Up);

        // Nothing pending: heading unchanged
        mode.set_direction(&mut input);
        assert_eq!(mode.body().heading(), Direction::Up);
    }

    #[test]
    fn test_autonomous_ignores_input() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        let mut input = OneShot(Some(Direction::Up));

        mode.set_direction(&mut input);
        assert_eq!(mode.body().heading(), Direction::Right);
        assert_eq!(input.0, Some(Direction::Up));
    }

    #[test]
    #[should_panic(expected = "needs an action")]
    fn test_autonomous_move_without_action_panics() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        mode.move_snake(None);
    }

    #[test]
    fn test_human_move_ignores_action() {
        let mut mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        mode.move_snake(Some(Action::TurnLeft));
        assert_eq!(mode.body().heading(), Direction::Right);
        assert_eq!(mode.body().head(), Cell::new(340, 320));
    }

    #[test]
    fn test_food_grows_and_scores() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        let mut food = FixedFood::at(Cell::new(340, 320));

        mode.begin_tick();
        mode.move_snake(Some(Action::Straight));
        mode.insert_head();
        assert!(!mode.check_termination(None));
        assert!(mode.resolve_food(&mut food));

        assert_eq!(mode.body().len(), 4);
        assert_eq!(mode.score(), 1);
        assert_eq!(mode.reward(), Some(10));
        assert_eq!(food.replenished, 1);
    }

    #[test]
    fn test_no_food_keeps_length() {
        let mut mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        let mut food = FixedFood::at(Cell::new(0, 0));

        mode.move_snake(None);
        mode.insert_head();
        assert!(!mode.resolve_food(&mut food));
        assert_eq!(mode.body().len(), 3);
        assert_eq!(mode.score(), 0);
    }

    #[test]
    fn test_collision_sets_death_penalty() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        mode.begin_tick();

        assert!(mode.check_termination(Some(CollisionType::Wall)));
        assert_eq!(mode.reward(), Some(-10));
        assert_eq!(
            mode.termination_cause(),
            Some(TerminationCause::Collision(CollisionType::Wall))
        );
    }

    #[test]
    fn test_termination_is_sticky() {
        let mut mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        assert!(mode.check_termination(Some(CollisionType::SelfCollision)));
        assert!(mode.check_termination(None));
        assert!(mode.is_terminated());
    }

    #[test]
    fn test_food_reward_overwrites_death_penalty() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        let mut food = FixedFood::at(Cell::new(340, 320));

        mode.begin_tick();
        mode.move_snake(Some(Action::Straight));
        mode.insert_head();
        assert!(mode.check_termination(Some(CollisionType::Wall)));
        mode.resolve_food(&mut food);

        assert_eq!(
            mode.outcome(),
            Outcome::Autonomous {
                reward: 10,
                terminated: true,
                score: 1
            }
        );
    }

    #[test]
    fn test_stall_rule() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());

        for _ in 0..300 {
            mode.begin_tick();
        }
        assert!(!mode.check_termination(None));

        mode.begin_tick();
        assert!(mode.check_termination(None));
        assert_eq!(mode.termination_cause(), Some(TerminationCause::Stall));
        assert_eq!(mode.reward(), Some(-10));
    }

    #[test]
    fn test_stall_rule_ignores_the_new_head() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        let mut food = FixedFood::at(Cell::new(0, 0));

        for _ in 0..300 {
            mode.begin_tick();
            mode.move_snake(Some(Action::TurnRight));
            mode.insert_head();
            assert!(!mode.check_termination(None));
            mode.resolve_food(&mut food);
        }
        assert_eq!(mode.body().len(), 3);

        mode.begin_tick();
        mode.move_snake(Some(Action::TurnRight));
        mode.insert_head();
        assert!(mode.check_termination(None));
        assert_eq!(mode.termination_cause(), Some(TerminationCause::Stall));
        assert_eq!(mode.step_count(), Some(301));
    }

    #[test]
    fn test_human_never_stalls() {
        let mut mode = ControlMode::new(ModeKind::Human, &GameConfig::default());
        for _ in 0..1000 {
            mode.begin_tick();
        }
        assert!(!mode.check_termination(None));
    }

    #[test]
    fn test_begin_tick_clears_reward() {
        let mut mode = ControlMode::new(ModeKind::Autonomous, &GameConfig::default());
        mode.begin_tick();
        mode.check_termination(Some(CollisionType::Wall));
        assert_eq!(mode.reward(), Some(-10));

        mode.begin_tick();
        assert_eq!(mode.reward(), Some(0));
        assert_eq!(mode.step_count(), Some(2));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let config = GameConfig::default();
        let mut mode = ControlMode::new(ModeKind::Autonomous, &config);
        let mut food = FixedFood::at(Cell::new(340, 320));

        mode.begin_tick();
        mode.move_snake(Some(Action::Straight));
        mode.insert_head();
        mode.check_termination(Some(CollisionType::Wall));
        mode.resolve_food(&mut food);

        mode.reset(&mut food);
        let fresh = ControlMode::new(ModeKind::Autonomous, &config);

        assert_eq!(mode.outcome(), fresh.outcome());
        assert_eq!(mode.body(), fresh.body());
        assert_eq!(mode.step_count(), Some(0));
        assert_eq!(mode.termination_cause(), None);
        assert_eq!(food.replenished, 2);
    }
}
