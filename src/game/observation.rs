use super::action::{Action, Direction};
use super::engine::Simulation;

/// Length of the feature vector
pub const OBSERVATION_SIZE: usize = 11;

/// What an autonomous agent gets to see after each tick
///
/// Features, in order:
/// - 0..3: danger straight / right / left of the current heading
/// - 3..7: heading is left / right / up / down (exactly one set)
/// - 7..11: food is left / right / up / down of the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub danger_straight: bool,
    pub danger_right: bool,
    pub danger_left: bool,
    pub heading: Direction,
    pub food_left: bool,
    pub food_right: bool,
    pub food_up: bool,
    pub food_down: bool,
}

impl Observation {
    /// Would taking `action` collide on the next tick?
    pub fn danger(&self, action: Action) -> bool {
        match action {
            Action::Straight => self.danger_straight,
            Action::TurnRight => self.danger_right,
            Action::TurnLeft => self.danger_left,
        }
    }

    /// Is the food strictly on the `direction` side of the head?
    pub fn food_towards(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.food_left,
            Direction::Right => self.food_right,
            Direction::Up => self.food_up,
            Direction::Down => self.food_down,
        }
    }

    pub fn features(&self) -> [bool; OBSERVATION_SIZE] {
        [
            self.danger_straight,
            self.danger_right,
            self.danger_left,
            self.heading == Direction::Left,
            self.heading == Direction::Right,
            self.heading == Direction::Up,
            self.heading == Direction::Down,
            self.food_left,
            self.food_right,
            self.food_up,
            self.food_down,
        ]
    }

    /// Features as 0.0 / 1.0, ready for a function approximator
    pub fn to_vec(&self) -> Vec<f32> {
        self.features()
            .iter()
            .map(|&flag| if flag { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Build the observation for the simulation's current state
pub fn create_observation(simulation: &Simulation) -> Observation {
    let body = simulation.body();
    let head = body.head();
    let heading = body.heading();
    let food = simulation.food();

    let danger = |action: Action| {
        let next = head.stepped(heading.turned(action), body.block_size());
        simulation.collision_check(next).is_some()
    };

    Observation {
        danger_straight: danger(Action::Straight),
        danger_right: danger(Action::TurnRight),
        danger_left: danger(Action::TurnLeft),
        heading,
        food_left: food.x < head.x,
        food_right: food.x > head.x,
        food_up: food.y < head.y,
        food_down: food.y > head.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Body, Cell, GameConfig, ModeKind};

    fn simulation() -> Simulation {
        let config = GameConfig {
            seed: Some(9),
            ..GameConfig::default()
        };
        Simulation::new(config, ModeKind::Autonomous).unwrap()
    }

    #[test]
    fn test_observation_size() {
        let obs = simulation().observation();
        assert_eq!(obs.features().len(), OBSERVATION_SIZE);
        assert_eq!(obs.to_vec().len(), OBSERVATION_SIZE);
    }

    #[test]
    fn test_exactly_one_heading_flag() {
        let mut sim = simulation();
        for action in [Action::TurnLeft, Action::Straight, Action::TurnRight] {
            sim.place_food_at(Cell::new(0, 0));
            sim.tick(Some(action));
            let heading_flags = sim.observation().features()[3..7]
                .iter()
                .filter(|&&flag| flag)
                .count();
            assert_eq!(heading_flags, 1);
        }
    }

    #[test]
    fn test_no_danger_in_open_field() {
        let mut sim = simulation();
        sim.place_food_at(Cell::new(0, 0));

        let obs = sim.observation();
        assert!(!obs.danger_straight);
        assert!(!obs.danger_right);
        assert!(!obs.danger_left);
        assert_eq!(obs.heading, Direction::Right);
    }

    #[test]
    fn test_wall_danger() {
        let mut sim = simulation();
        // Top-right corner, heading right: straight and left (up) are walls
        sim.replace_body(Body::laid_out(Cell::new(620, 0), Direction::Right, 3, 20));
        sim.place_food_at(Cell::new(0, 600));

        let obs = sim.observation();
        assert!(obs.danger_straight);
        assert!(!obs.danger_right);
        assert!(obs.danger_left);
    }

    #[test]
    fn test_body_danger() {
        let mut sim = simulation();
        // Hooked body: the cell right of the heading is occupied
        sim.replace_body(Body::from_cells(
            vec![
                Cell::new(100, 100),
                Cell::new(80, 100),
                Cell::new(80, 120),
                Cell::new(100, 120),
                Cell::new(120, 120),
            ],
            Direction::Right,
            20,
        ));
        sim.place_food_at(Cell::new(0, 0));

        let obs = sim.observation();
        assert!(!obs.danger_straight);
        assert!(obs.danger_right);
        assert!(!obs.danger_left);
    }

    #[test]
    fn test_food_direction() {
        let mut sim = simulation();
        sim.place_food_at(Cell::new(0, 0)); // up-left of the centre

        let obs = sim.observation();
        assert!(obs.food_left);
        assert!(!obs.food_right);
        assert!(obs.food_up);
        assert!(!obs.food_down);
        assert!(obs.food_towards(Direction::Left));
        assert!(!obs.food_towards(Direction::Down));

        let head = sim.body().head();
        sim.place_food_at(Cell::new(head.x, head.y + 40)); // straight below
        let obs = sim.observation();
        assert!(!obs.food_left && !obs.food_right && !obs.food_up);
        assert!(obs.food_down);
    }

    #[test]
    fn test_danger_lookup_by_action() {
        let mut sim = simulation();
        sim.replace_body(Body::laid_out(Cell::new(620, 0), Direction::Right, 3, 20));

        let obs = sim.observation();
        assert!(obs.danger(Action::Straight));
        assert!(!obs.danger(Action::TurnRight));
        assert!(obs.danger(Action::TurnLeft));
    }

    #[test]
    fn test_vector_encoding() {
        let mut sim = simulation();
        sim.place_food_at(Cell::new(0, 0));

        let values = sim.observation().to_vec();
        assert!(values.iter().all(|&v| v == 0.0 || v == 1.0));
        assert_eq!(values[4], 1.0); // heading right
    }
}
