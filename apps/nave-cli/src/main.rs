use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use nave_assets::{BuiltinLoader, CHAPEL_ASSETS, GeometryLoader, JsonModelLoader, scene};
use nave_common::{Intent, WalkConfig};
use nave_input::{InputEvent, InputRouter, Key};
use nave_kernel::{COLLISION_MARGIN, ManualClock, PROBE_VERTICAL_SCALE, Session, SilentAudio};
use nave_render::{DebugTextRenderer, HeadlessHost, RenderLoop, Viewport};
use nave_stream::LoadFailure;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nave-cli", about = "Headless tools for the chapel walkthrough")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Load JSON models from this directory instead of built-in geometry
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Walk {
    Forward,
    Back,
    Left,
    Right,
}

impl Walk {
    fn key(self) -> Key {
        match self {
            Self::Forward => Key::W,
            Self::Back => Key::S,
            Self::Left => Key::A,
            Self::Right => Key::D,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and collision tuning
    Info,
    /// Print the effective session config as JSON
    Config,
    /// Load the chapel and run the frame loop headless
    Simulate {
        /// Number of ticks after loading
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Directions to hold for the whole run
        #[arg(short, long, value_enum)]
        walk: Vec<Walk>,
        /// Turn by this many degrees before walking (positive turns left)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        turn: f32,
        /// Show collider proxies in the final frame
        #[arg(long)]
        colliders: bool,
        /// Seconds to wait for loads before giving up
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Run the readiness scenario: hold back one load, then release it
    GateScenario {
        #[arg(long, default_value = "17")]
        loads: usize,
        #[arg(long, default_value = "1000")]
        ticks_before: u64,
        #[arg(long, default_value = "500")]
        ticks_after: u64,
    },
    /// List what each asset contributes to the scene
    Layout {
        /// Print the collider boxes as JSON
        #[arg(long)]
        json: bool,
    },
}

fn loader(config: &WalkConfig, models: bool) -> Arc<dyn GeometryLoader> {
    if models {
        Arc::new(JsonModelLoader::new(&config.model_root))
    } else {
        Arc::new(BuiltinLoader::new())
    }
}

fn headless_session(config: WalkConfig, clock: &ManualClock) -> Session {
    Session::new(config, Box::new(clock.clone()), Box::new(SilentAudio))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = match &cli.config {
        Some(path) => WalkConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => WalkConfig::default(),
    };
    let use_models = cli.models.is_some();
    if let Some(models) = cli.models {
        config.model_root = models;
    }

    match cli.command {
        Commands::Info => {
            println!("nave-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", nave_assets::crate_info());
            println!("stream: {}", nave_stream::crate_info());
            println!("input: {}", nave_input::crate_info());
            println!("render: {}", nave_render::crate_info());
            println!("startup assets: {}", CHAPEL_ASSETS.len());
            println!("probe vertical scale: {PROBE_VERTICAL_SCALE}");
            println!("collision margin: {COLLISION_MARGIN}");
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Simulate {
            ticks,
            walk,
            turn,
            colliders,
            timeout,
        } => {
            let clock = ManualClock::new();
            let sensitivity = config.look_sensitivity;
            let mut session = headless_session(config.clone(), &clock);
            session.start_loads(loader(&config, use_models), &CHAPEL_ASSETS)?;
            let delivered = session.preload(Duration::from_secs(timeout))?;
            if let Some(failure) = session.load_failure() {
                report_failure(failure);
                bail!("startup loads did not complete");
            }
            tracing::info!(delivered, "startup loads complete");

            let mut frame_loop = RenderLoop::new(&session);
            let mut renderer = DebugTextRenderer::new();
            let mut host = HeadlessHost::new(Viewport::new(1280, 720));
            let mut router = InputRouter::default();

            session.apply(router.route(InputEvent::Click));
            if turn != 0.0 && sensitivity > 0.0 {
                let dx = -turn.to_radians() / sensitivity;
                session.apply(router.route(InputEvent::PointerMotion { dx, dy: 0.0 }));
            }
            for w in &walk {
                session.apply(router.route(InputEvent::KeyDown(w.key())));
            }
            if colliders {
                session.apply(router.route(InputEvent::KeyDown(Key::E)));
            }

            let mut blocked = 0u64;
            let mut last = String::new();
            for _ in 0..ticks {
                clock.advance(1.0 / 60.0);
                let report = frame_loop.tick(&mut session, &mut renderer, &mut host)?;
                if let Some(step) = report.step {
                    blocked += [step.longitudinal, step.lateral]
                        .iter()
                        .flatten()
                        .filter(|r| r.is_blocked())
                        .count() as u64;
                }
                last = report.output;
            }

            print!("{last}");
            println!("{}", session.summary());
            println!("blocked moves: {blocked}");
            let held: Vec<&str> = [
                (Intent::Forward, "forward"),
                (Intent::Back, "back"),
                (Intent::Left, "left"),
                (Intent::Right, "right"),
            ]
            .iter()
            .filter(|(i, _)| session.intents().is_active(*i))
            .map(|(_, name)| *name)
            .collect();
            println!("held: {}", if held.is_empty() { "none".into() } else { held.join("+") });
        }
        Commands::GateScenario {
            loads,
            ticks_before,
            ticks_after,
        } => {
            if loads == 0 {
                bail!("the scenario needs at least one load");
            }
            let clock = ManualClock::new();
            let mut session = headless_session(config, &clock);
            let mut frame_loop = RenderLoop::new(&session);
            let mut renderer = DebugTextRenderer::new();
            let mut host = HeadlessHost::new(Viewport::new(640, 480));

            for _ in 0..loads {
                session.begin_load()?;
            }
            for _ in 1..loads {
                session.complete_load(Default::default())?;
            }

            let mut expansions = 0;
            for _ in 0..ticks_before {
                let report = frame_loop.tick(&mut session, &mut renderer, &mut host)?;
                if report.ready || report.expanded_now {
                    bail!("ready with a load still pending at tick {}", report.tick);
                }
            }
            println!(
                "{} of {loads} complete after {ticks_before} ticks: not ready",
                loads - 1
            );

            session.complete_load(Default::default())?;
            for _ in 0..ticks_after {
                let report = frame_loop.tick(&mut session, &mut renderer, &mut host)?;
                if report.expanded_now {
                    expansions += 1;
                    println!("expanded at tick {}", report.tick);
                }
            }
            if expansions != 1 {
                bail!("expected exactly one expansion, saw {expansions}");
            }
            println!("ready; {expansions} expansion in {ticks_after} ticks");
        }
        Commands::Layout { json } => {
            let loader = loader(&config, use_models);
            let mut all = Vec::new();
            let mut failed = false;
            for spec in &CHAPEL_ASSETS {
                match loader.load(spec) {
                    Ok(geometry) => {
                        let c = scene::contribution(spec, &geometry);
                        if !json {
                            println!(
                                "{:<14} vertices={:<6} colliders={:<3} props={:<3} candles={}",
                                spec.name,
                                geometry.vertex_count(),
                                c.colliders.len(),
                                c.props.len(),
                                c.decoratives.len()
                            );
                        }
                        all.extend(c.colliders);
                    }
                    Err(e) => {
                        failed = true;
                        eprintln!("{:<14} failed: {e}", spec.name);
                    }
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                println!("total colliders: {}", all.len());
            }
            if failed {
                bail!("some assets failed to load");
            }
        }
    }

    Ok(())
}

fn report_failure(failure: &LoadFailure) {
    match failure {
        LoadFailure::Failed { asset, reason } => eprintln!("load failed: {asset}: {reason}"),
        LoadFailure::Stalled { assets, waited } => {
            eprintln!("loads still pending after {waited:?}: {}", assets.join(", "))
        }
    }
}
