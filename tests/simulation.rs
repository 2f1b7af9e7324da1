use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snake_modes::game::{
    Action, Cell, Direction, GameConfig, ModeKind, OBSERVATION_SIZE, Outcome, Simulation,
    TerminationCause,
};

fn seeded(config: GameConfig, seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..config
    }
}

fn assert_connected(sim: &Simulation) {
    let block = sim.board().block_size;
    let cells = sim.body().cells();
    for pair in cells.iter().collect::<Vec<_>>().windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let distance = (a.x - b.x).abs() + (a.y - b.y).abs();
        assert_eq!(distance, block, "cells {a:?} and {b:?} are not neighbours");
    }
}

#[test]
fn straight_human_run_ends_at_the_wall() {
    let mut sim = Simulation::new(seeded(GameConfig::default(), 1), ModeKind::Human).unwrap();
    assert_eq!(sim.body().head(), Cell::new(320, 320));

    for tick in 1..16 {
        let outcome = sim.tick(None);
        assert!(!outcome.terminated(), "ended early on tick {tick}");
        assert_eq!(sim.body().head(), Cell::new(320 + 20 * tick, 320));
    }

    let outcome = sim.tick(None);
    assert!(outcome.terminated());
    assert_eq!(sim.body().head(), Cell::new(640, 320));
}

#[test]
fn random_play_keeps_the_board_consistent() {
    let mut rng = StdRng::seed_from_u64(99);

    for seed in 0..20 {
        let config = seeded(GameConfig::small(), seed);
        let initial_length = config.initial_length;
        let mut sim = Simulation::new(config, ModeKind::Autonomous).unwrap();

        while !sim.is_terminated() {
            let action = Action::ALL[rng.gen_range(0..Action::ALL.len())];
            let outcome = sim.tick(Some(action));

            // Growth law
            assert_eq!(sim.body().len(), initial_length + outcome.score() as usize);

            if outcome.terminated() {
                break;
            }

            assert!(sim.body().cells().iter().all(|&c| sim.board().contains(c)));
            assert!(!sim.body().occupies(sim.food()));
            assert!(sim.board().contains(sim.food()));
            assert_connected(&sim);

            let reward = outcome.reward().unwrap();
            assert!(reward == 0 || reward == 10, "unexpected reward {reward}");
        }
    }
}

#[test]
fn reset_starts_a_fresh_episode() {
    let mut sim = Simulation::new(seeded(GameConfig::small(), 5), ModeKind::Autonomous).unwrap();
    let start = sim.body().head();

    while !sim.is_terminated() {
        sim.tick(Some(Action::TurnLeft));
    }
    assert!(sim.mode().step_count().unwrap() > 0);

    sim.reset();

    assert_eq!(
        sim.outcome(),
        Outcome::Autonomous {
            reward: 0,
            terminated: false,
            score: 0
        }
    );
    assert_eq!(sim.mode().step_count(), Some(0));
    assert_eq!(sim.body().head(), start);
    assert_eq!(sim.body().heading(), Direction::Right);
    assert_eq!(sim.body().len(), 3);
}

#[test]
fn circling_agent_is_stopped_by_the_stall_rule() {
    let mut sim = Simulation::new(seeded(GameConfig::default(), 8), ModeKind::Autonomous).unwrap();
    assert_eq!(sim.body().head(), Cell::new(320, 320));

    // Circle a 2x2 square below the head, or above it when the food sits below.
    // The food never moves, so the snake stays at length 3.
    let below = [Cell::new(320, 340), Cell::new(300, 340)];
    let turn = if below.contains(&sim.food()) {
        Action::TurnLeft
    } else {
        Action::TurnRight
    };

    for tick in 1..=300 {
        let outcome = sim.tick(Some(turn));
        assert!(!outcome.terminated(), "ended early on tick {tick}");
    }

    let outcome = sim.tick(Some(turn));
    assert_eq!(
        outcome,
        Outcome::Autonomous {
            reward: -10,
            terminated: true,
            score: 0
        }
    );
    assert_eq!(sim.mode().termination_cause(), Some(TerminationCause::Stall));
    assert_eq!(sim.mode().step_count(), Some(301));
    assert_eq!(sim.body().len(), 3);
}

#[test]
fn observation_has_one_heading_bit() {
    let mut sim = Simulation::new(seeded(GameConfig::small(), 2), ModeKind::Autonomous).unwrap();

    for action in [Action::Straight, Action::TurnRight, Action::TurnRight] {
        sim.tick(Some(action));
        let features = sim.observation().features();
        assert_eq!(features.len(), OBSERVATION_SIZE);
        assert_eq!(features[3..7].iter().filter(|&&bit| bit).count(), 1);
    }
}

#[test]
fn one_hot_actions_steer_relative_to_heading() {
    let mut sim = Simulation::new(seeded(GameConfig::small(), 3), ModeKind::Autonomous).unwrap();

    sim.tick(Some(Action::from_one_hot([0, 1, 0])));
    assert_eq!(sim.body().heading(), Direction::Down);

    sim.tick(Some(Action::from_one_hot([0, 0, 1])));
    assert_eq!(sim.body().heading(), Direction::Right);

    sim.tick(Some(Action::from_one_hot([1, 0, 0])));
    assert_eq!(sim.body().heading(), Direction::Right);

    assert!(Action::try_from([1, 1, 0]).is_err());
}
