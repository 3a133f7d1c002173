//! Truck Catch headless runner
//!
//! Loads tuning and assets, then plays one full session on a simulated clock:
//! a fixed-timestep frame loop plus a wall-clock second interval, the same two
//! timing sources a browser host would wire up.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Serialize;

use truck_catch::assets::{FsTextureSource, SessionAssets};
use truck_catch::consts::{FRAME_RATE, SIM_DT};
use truck_catch::hud::{self, Hud, Summary};
use truck_catch::input::InputAggregator;
use truck_catch::sim::{
    FixedStep, IntervalDriver, autopilot, clock_second, continue_play, start, tick,
};
use truck_catch::{MissingAssetPolicy, Phase, QualityPreset, Session, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "truck-catch")]
#[command(about = "Play one headless Truck Catch session and print the result")]
struct Args {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Tuning overrides as JSON
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Settings as JSON
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Quality preset, overrides the settings file
    #[arg(long, value_enum)]
    quality: Option<QualityPreset>,
    /// Asset manifest; the bundled manifest with placeholders is used if absent
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Directory manifest paths are resolved against
    #[arg(long, default_value = ".")]
    assets_root: PathBuf,
    /// Substitute placeholders for textures that fail to load
    #[arg(long, default_value_t = false)]
    placeholder_assets: bool,
    /// Host frame rate being simulated
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Let the autopilot steer instead of leaving the truck parked
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[derive(Serialize)]
struct Report {
    seed: u64,
    frames: u64,
    prize_achieved: bool,
    summary: Summary,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    ensure!(args.fps > 0.0, "--fps must be positive, got {}", args.fps);

    let tuning = match &args.tuning {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading tuning {}", path.display()))?;
            Tuning::from_json(&json).with_context(|| format!("parsing tuning {}", path.display()))?
        }
        None => Tuning::default(),
    };

    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("parsing settings {}", path.display()))?
        }
        None => Settings::default(),
    };
    if let Some(quality) = args.quality {
        settings.quality = quality;
    }

    let assets = load_assets(&args, &tuning)?;
    let seed = args.seed.unwrap_or_else(time_seed);

    let mut session = Session::new(tuning, settings, assets, seed).context("building session")?;
    let report = run(&mut session, &args);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_assets(args: &Args, tuning: &Tuning) -> Result<SessionAssets> {
    let Some(path) = &args.manifest else {
        log::info!("No manifest given, using bundled placeholders");
        return Ok(SessionAssets::placeholder(tuning)?);
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    let policy = if args.placeholder_assets {
        MissingAssetPolicy::Placeholder
    } else {
        MissingAssetPolicy::Fail
    };
    let mut source = FsTextureSource::new(args.assets_root.clone());
    let assets = SessionAssets::load(&json, &mut source, policy, tuning, |percent| {
        log::debug!("Loading assets: {percent}%");
    })
    .with_context(|| format!("loading assets from {}", path.display()))?;
    Ok(assets)
}

fn run(session: &mut Session, args: &Args) -> Report {
    let frame_seconds = 1.0 / args.fps;
    let mut stepper = FixedStep::default();
    let mut interval = IntervalDriver::default();
    let mut input = InputAggregator::new();

    start(session);

    while session.phase != Phase::Ended {
        // Frame ticker
        for _ in 0..stepper.advance(frame_seconds) {
            let frame = if args.demo {
                autopilot(session)
            } else {
                input.poll(&())
            };
            tick(session, &frame, SIM_DT * FRAME_RATE);
        }

        for event in session.drain_events() {
            log::debug!("{event:?}");
        }

        if session.phase == Phase::Paused {
            log::info!("Prize overlay up at {} points, continuing", session.score);
            continue_play(session);
            input.reset();
        }

        // Wall-clock interval
        let ticks = interval.advance(session.timer_handle(), frame_seconds);
        for _ in 0..ticks {
            let Some(handle) = session.timer_handle() else {
                break;
            };
            if clock_second(session, handle) {
                let hud = Hud::from_session(session);
                log::info!(
                    "{} | score {} | {} | {}{}",
                    hud.countdown_label,
                    hud.score,
                    hud.stage_label,
                    hud.prize_label,
                    hud.multiplier_badge
                        .as_deref()
                        .map(|badge| format!(" | {badge}"))
                        .unwrap_or_default()
                );
            }
        }
    }

    Report {
        seed: session.seed,
        frames: session.frames,
        prize_achieved: session.prize_achieved,
        summary: hud::summary(session),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
