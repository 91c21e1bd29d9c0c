//! Property tests over random input sequences

use galaxy_run::BestStats;
use galaxy_run::consts::MAX_FUEL;
use galaxy_run::settings::{Ruleset, SessionConfig};
use galaxy_run::sim::{GameEvent, GamePhase, GameSession, TickInput};
use glam::Vec2;
use proptest::prelude::*;

fn ruleset() -> impl Strategy<Value = Ruleset> {
    prop_oneof![Just(Ruleset::Canvas), Just(Ruleset::Arena)]
}

fn step() -> impl Strategy<Value = (f32, f32, bool, f32)> {
    (-2.0f32..2.0, -2.0f32..2.0, any::<bool>(), 0.0f32..0.25)
}

fn busy_session(ruleset: Ruleset, seed: u64) -> GameSession {
    let mut config = SessionConfig::for_ruleset(ruleset);
    // Crowd the arena so enemies, contacts and attacks all happen
    config.spawn.spawn_rate = 20.0;
    let mut session = GameSession::new(config, seed, BestStats::default());
    session.start_game();
    session
}

proptest! {
    #[test]
    fn fuel_stays_in_range(
        ruleset in ruleset(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..200),
    ) {
        let mut session = busy_session(ruleset, seed);
        for (x, y, bomb, dt) in steps {
            session.tick(&TickInput { direction: Vec2::new(x, y), bomb }, dt);
            prop_assert!(session.player.fuel >= 0.0 && session.player.fuel <= MAX_FUEL);
            prop_assert!(session.registry.enemies.len() <= session.config.spawn.max_enemies);
            if session.phase == GamePhase::LevelComplete {
                session.next_level();
            }
        }
    }

    #[test]
    fn only_legal_state_transitions(
        ruleset in ruleset(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..200),
    ) {
        let mut session = busy_session(ruleset, seed);
        for (x, y, bomb, dt) in steps {
            session.tick(&TickInput { direction: Vec2::new(x, y), bomb }, dt);
            for event in session.drain_events() {
                if let GameEvent::StateChanged { from, to, .. } = event {
                    prop_assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
                }
            }
            if session.phase != GamePhase::Running {
                break;
            }
        }
    }

    #[test]
    fn zero_dt_is_idempotent(
        ruleset in ruleset(),
        seed in any::<u64>(),
        warmup in prop::collection::vec(step(), 0..60),
    ) {
        let mut session = busy_session(ruleset, seed);
        for (x, y, _, dt) in warmup {
            session.tick(&TickInput { direction: Vec2::new(x, y), bomb: false }, dt);
        }
        session.drain_events();

        let fuel = session.player.fuel;
        let pos = session.player.pos;
        let phase = session.phase;
        let score = session.score;
        let enemies: Vec<_> = session.registry.enemies.iter().map(|e| (e.id, e.pos, e.state)).collect();

        session.tick(&TickInput { direction: Vec2::X, bomb: false }, 0.0);

        prop_assert_eq!(session.player.fuel, fuel);
        prop_assert_eq!(session.player.pos, pos);
        prop_assert_eq!(session.phase, phase);
        prop_assert_eq!(session.score, score);
        let after: Vec<_> = session.registry.enemies.iter().map(|e| (e.id, e.pos, e.state)).collect();
        prop_assert_eq!(after, enemies);
        prop_assert!(session.events().is_empty());
    }

    #[test]
    fn second_bomb_within_cooldown_is_noop(
        seed in any::<u64>(),
        wait in 0.0f32..9.5,
    ) {
        let mut session = busy_session(Ruleset::Canvas, seed);
        session.config.fuel_drain_per_sec = 0.0;
        session.config.enemy_fuel_penalty = 0.0;
        prop_assert!(session.activate_bomb());

        // Advance in small steps, staying below the 10 s cooldown
        let mut waited = 0.0;
        while waited + 0.1 <= wait && session.phase == GamePhase::Running {
            session.tick(&TickInput::default(), 0.1);
            waited += 0.1;
        }
        prop_assume!(session.phase == GamePhase::Running);

        let enemies = session.registry.enemies.len();
        let fuel = session.player.fuel;
        session.drain_events();
        prop_assert!(!session.activate_bomb());
        prop_assert_eq!(session.registry.enemies.len(), enemies);
        prop_assert_eq!(session.player.fuel, fuel);
        prop_assert!(session.events().is_empty());
    }

    #[test]
    fn same_seed_same_run(
        ruleset in ruleset(),
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..100),
    ) {
        let mut a = busy_session(ruleset, seed);
        let mut b = busy_session(ruleset, seed);
        for (x, y, bomb, dt) in steps {
            let input = TickInput { direction: Vec2::new(x, y), bomb };
            a.tick(&input, dt);
            b.tick(&input, dt);
        }
        prop_assert_eq!(a.drain_events(), b.drain_events());
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.player.pos, b.player.pos);
    }
}
