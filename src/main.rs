//! Galaxy Run headless demo
//!
//! Plays an autopilot run at a fixed timestep and prints a summary.
//!
//! Usage: `galaxy-run [canvas|arena] [seed] [stats.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use galaxy_run::consts::SIM_DT;
    use galaxy_run::sim::{GameEvent, GamePhase, TickInput};
    use galaxy_run::{Collaborators, JsonStatsFile, MemoryStats, Ruleset, SessionConfig, SessionDriver};

    /// Simulated seconds before the demo stops on its own
    const DEMO_SECONDS: f32 = 600.0;
    /// Host frame length; the loop steps the sim in SIM_DT slices
    const FRAME_DT: f32 = 1.0 / 30.0;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let ruleset = args
        .next()
        .map(|s| {
            Ruleset::from_str(&s).unwrap_or_else(|| {
                log::warn!("Unknown ruleset '{}', using canvas", s);
                Ruleset::default()
            })
        })
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);

    let collaborators = match args.next() {
        Some(path) => Collaborators::none().with_stats(JsonStatsFile::new(path)),
        None => Collaborators::none().with_stats(MemoryStats::default()),
    };

    log::info!("Galaxy Run (native) starting: {} rules, seed {}", ruleset.as_str(), seed);
    let mut driver = SessionDriver::new(SessionConfig::for_ruleset(ruleset), seed, collaborators);
    driver.start_game();

    let mut accumulator = 0.0f32;
    let mut simulated = 0.0f32;
    let mut hits = 0u32;
    let mut bombs = 0u32;

    'frames: while simulated < DEMO_SECONDS {
        accumulator += FRAME_DT;
        while accumulator >= SIM_DT {
            accumulator -= SIM_DT;
            simulated += SIM_DT;

            let input = TickInput::autopilot(driver.session());
            for event in driver.tick(&input, SIM_DT) {
                match event {
                    GameEvent::PlayerHit { .. } => hits += 1,
                    GameEvent::BombDetonated { .. } => bombs += 1,
                    _ => {}
                }
            }

            match driver.session().phase {
                GamePhase::LevelComplete => {
                    driver.next_level();
                }
                GamePhase::GameOver => {
                    driver.show_main_menu();
                    break 'frames;
                }
                GamePhase::Running | GamePhase::MainMenu => {}
            }
        }
    }

    let session = driver.session();
    log::info!("Demo finished after {:.1}s simulated", simulated);
    println!("Ruleset:     {}", ruleset.as_str());
    println!("Seed:        {}", seed);
    println!("Score:       {}", session.score);
    println!("Level:       {}", session.level);
    println!("Fuel:        {:.1}", session.player.fuel);
    println!("Enemy hits:  {}", hits);
    println!("Bombs:       {}", bombs);
    println!(
        "Best:        {} (level {})",
        session.best.high_score, session.best.max_level
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
