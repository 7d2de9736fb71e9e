//! Cosmic Runner headless driver
//!
//! Runs a session with a simple autopilot either tick-by-tick as fast as
//! possible (`--ticks`) or in real time on the session loop thread
//! (`--seconds`), then prints the results and lifetime totals.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};

    use clap::Parser;

    use cosmic_runner::achievements::{ACHIEVEMENTS, Unlocked};
    use cosmic_runner::lane_offset;
    use cosmic_runner::persistence::{HighScoreRecord, JsonFileStore, MemoryStore};
    use cosmic_runner::runner::SessionRunner;
    use cosmic_runner::sim::{EntityCategory, SessionPhase};
    use cosmic_runner::{Command, Difficulty, GameSettings, HighScores, RenderSnapshot, Session};

    /// How far ahead the autopilot looks for obstacles
    const LOOKAHEAD: f32 = 12.0;

    /// Cosmic Runner: endless lane-runner simulation
    #[derive(Parser)]
    #[command(version, about)]
    struct Cli {
        /// JSON settings file (missing fields use defaults)
        #[arg(long, value_name = "PATH")]
        settings: Option<PathBuf>,

        /// Difficulty preset: easy, normal or hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Fixed run seed
        #[arg(long)]
        seed: Option<u64>,

        /// Simulate this many ticks without waiting on the wall clock
        #[arg(long, default_value_t = 20_000, conflicts_with = "seconds")]
        ticks: u64,

        /// Play in real time on the loop thread for this many seconds
        #[arg(long)]
        seconds: Option<u64>,

        /// Persist totals to this JSON file instead of memory
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,
    }

    pub fn main() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let mut settings = cli
            .settings
            .as_deref()
            .map(GameSettings::load_from)
            .unwrap_or_default();
        if let Some(name) = cli.difficulty.as_deref() {
            match Difficulty::from_str(name) {
                Some(difficulty) => settings.apply_difficulty(difficulty),
                None => log::warn!("Unknown difficulty {:?}, keeping {}", name, settings.difficulty.as_str()),
            }
        }
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }

        let session = match cli.store {
            Some(path) => match JsonFileStore::open(&path) {
                Ok(store) => Session::new(settings).with_gateway(store),
                Err(e) => {
                    eprintln!("Error opening {}: {e}", path.display());
                    std::process::exit(1);
                }
            },
            None => Session::new(settings).with_gateway(MemoryStore::new()),
        };
        let session = session.on_end(|results| {
            log::info!("Run finished after {:.1}s", results.elapsed_ms / 1000.0);
        });

        let session = match cli.seconds {
            Some(seconds) => run_realtime(session, Duration::from_secs(seconds)),
            None => run_headless(session, cli.ticks),
        };
        report(&session);
    }

    fn run_headless(mut session: Session, ticks: u64) -> Session {
        session.start();
        for _ in 0..ticks {
            if let Some(command) = autopilot(&session.snapshot(), session.settings()) {
                session.command(command);
            }
            session.step();
            if session.phase() == SessionPhase::GameOver {
                break;
            }
        }
        session
    }

    fn run_realtime(session: Session, length: Duration) -> Session {
        let settings = session.settings().clone();
        let mut runner = match SessionRunner::spawn(session) {
            Ok(runner) => runner,
            Err(e) => {
                eprintln!("Error starting session loop: {e}");
                std::process::exit(1);
            }
        };

        let deadline = Instant::now() + length;
        let mut last_tick = u64::MAX;
        while Instant::now() < deadline {
            let snapshot = runner.snapshot();
            if snapshot.phase == SessionPhase::GameOver {
                break;
            }
            if snapshot.tick != last_tick {
                last_tick = snapshot.tick;
                if let Some(command) = autopilot(&snapshot, &settings) {
                    runner.send(command);
                }
            }
            thread::sleep(Duration::from_millis(4));
        }

        match runner.stop() {
            Some(session) => session,
            None => {
                eprintln!("Session loop did not shut down cleanly");
                std::process::exit(1);
            }
        }
    }

    /// Sidestep the nearest obstacle in the current lane, preferring the
    /// neighbour with the most clearance
    fn autopilot(snapshot: &RenderSnapshot, settings: &GameSettings) -> Option<Command> {
        let player = &snapshot.player;
        let clearance = |lane: u8| {
            let x = lane_offset(lane, settings.lane_count, settings.lane_width);
            snapshot
                .visible()
                .filter(|e| e.category == EntityCategory::Obstacle)
                .filter(|e| (e.pos.x - x).abs() < settings.lane_width / 2.0)
                .map(|e| player.pos.z - e.pos.z)
                .filter(|ahead| (0.0..LOOKAHEAD).contains(ahead))
                .fold(LOOKAHEAD, f32::min)
        };

        if clearance(player.lane) >= LOOKAHEAD {
            return None;
        }
        let left = (player.lane > 0).then(|| clearance(player.lane - 1));
        let right = (player.lane + 1 < settings.lane_count).then(|| clearance(player.lane + 1));
        match (left, right) {
            (Some(l), Some(r)) if r > l => Some(Command::MoveRight),
            (Some(_), _) => Some(Command::MoveLeft),
            (None, Some(_)) => Some(Command::MoveRight),
            (None, None) => None,
        }
    }

    fn report(session: &Session) {
        let results = session.results();
        println!("phase:    {:?}", session.phase());
        println!("score:    {}", results.score);
        println!("coins:    {}", results.coins);
        println!("level:    {}", results.level);
        println!("survived: {:.1}s", results.elapsed_ms / 1000.0);

        if let Some(report) = session.game_over_report() {
            if report
                .flush
                .as_ref()
                .is_some_and(|flush| flush.is_new_best(&results))
            {
                println!("new best score!");
            }
            if let Some(rank) = report.leaderboard_rank {
                println!("leaderboard rank: #{rank}");
            }
            for id in &report.new_achievements {
                if let Some(def) = cosmic_runner::achievements::find(id) {
                    println!("achievement unlocked: {} ({})", def.name, def.description);
                }
            }
        }
        if let Some(store) = session.gateway() {
            let record = HighScoreRecord::load(store);
            println!(
                "best {} | total coins {} | games {}",
                record.best_score, record.total_coins, record.games_played
            );
            if let Some(top) = HighScores::load(store).top_score() {
                println!("leaderboard top: {top}");
            }
            let unlocked = Unlocked::load(store);
            if !unlocked.is_empty() {
                println!("achievements: {}/{}", unlocked.len(), ACHIEVEMENTS.len());
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is a library; hosts drive `Session` directly
}
