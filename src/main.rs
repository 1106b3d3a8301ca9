//! Skyhop headless runner
//!
//! Plays one session with the autopilot steering, then prints the outcome.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde::Serialize;

use skyhop::collaborator::QueuedReporter;
use skyhop::{
    InputLatch, Leaderboard, Session, SessionEnd, SessionOutcome, Settings, autopilot,
};

#[derive(Parser, Debug)]
#[command(name = "skyhop", about = "Run a headless Skyhop session")]
struct Args {
    /// World seed, defaults to the current time
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Pace ticks against the wall clock at 60 Hz
    #[arg(long)]
    realtime: bool,

    /// Print the outcome and leaderboard as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    outcome: SessionOutcome,
    leaderboard: Option<&'a Leaderboard>,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let seed = args.seed.unwrap_or_else(clock_seed);
    let latch = InputLatch::new();
    let reporter = QueuedReporter::new(Leaderboard::new());

    let mut session = match Session::new(seed, &settings, latch.clone(), reporter) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = if args.realtime {
        run_realtime(&mut session, &latch, args.ticks)
    } else {
        run_headless(&mut session, &latch, args.ticks)
    };

    let leaderboard = session.into_collaborator().finish();

    if args.json {
        let report = Report {
            seed,
            outcome,
            leaderboard: leaderboard.as_ref(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!(
            "seed {}: score {} with {} coins, level {} after {} ticks ({:?})",
            seed, outcome.score, outcome.coins, outcome.level, outcome.ticks, outcome.end
        );
        if let Some(board) = &leaderboard {
            println!("wallet: {} coins", board.fetch_currency());
        }
    }

    ExitCode::SUCCESS
}

type Runner = Session<InputLatch, QueuedReporter<Leaderboard>>;

fn run_headless(session: &mut Runner, latch: &InputLatch, max_ticks: Option<u64>) -> SessionOutcome {
    let mut ticks = 0u64;
    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            return session.outcome(SessionEnd::TickLimit);
        }
        latch.set_touch(autopilot::steer(session.state()).touch);
        if !session.step() {
            break;
        }
        ticks += 1;
    }
    session.outcome(SessionEnd::GameOver)
}

fn run_realtime(session: &mut Runner, latch: &InputLatch, max_ticks: Option<u64>) -> SessionOutcome {
    let frame = Duration::from_millis(16);
    let mut last = Instant::now();
    loop {
        if max_ticks.is_some_and(|max| session.state().time_ticks >= max) {
            return session.outcome(SessionEnd::TickLimit);
        }
        if session.is_finished() {
            return session.outcome(SessionEnd::GameOver);
        }

        std::thread::sleep(frame);
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f32();
        last = now;

        latch.set_touch(autopilot::steer(session.state()).touch);
        session.advance(elapsed);
    }
}
