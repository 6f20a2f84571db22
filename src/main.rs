mod agent;
mod config;
mod data;
mod encounter;
mod error;
mod headless;
mod logging;
mod render;
mod session;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, anyhow};
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use clap::Parser;

use agent::{DecisionReply, DecisionWorker};
use config::{Backend, Config};
use logging::LogTarget;
use session::Session;

#[derive(Parser, Debug)]
#[command(version, about = "Theatre of Blood encounter bot")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decision backend, overriding the configuration file.
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Fixed RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Run one simulation without the terminal UI and print the event log.
    #[arg(long)]
    headless: bool,

    /// Diagnostic log file. Defaults to theatre-bot.log in interactive mode
    /// and stderr in headless mode.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

struct TheatreBotState {
    session: Session<RandomNumberGenerator>,
    worker: DecisionWorker,
    in_flight: Option<u64>,
    frame: u64,
}

impl GameState for TheatreBotState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        self.frame = self.frame.wrapping_add(1);
        self.pump_decisions();
        ctx.cls();
        render::draw(ctx, &self.session, self.frame);
    }
}

impl TheatreBotState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        if let Some(key) = ctx.key {
            match key {
                VirtualKeyCode::S => self.session.start(Instant::now()),
                VirtualKeyCode::X => self.session.stop(),
                VirtualKeyCode::M => {
                    self.session.toggle_mode();
                }
                VirtualKeyCode::Q | VirtualKeyCode::Escape => ctx.quit(),
                _ => {}
            }
        }
    }

    fn pump_decisions(&mut self) {
        loop {
            match self.worker.try_reply() {
                Ok(Some(reply)) => self.resolve(reply),
                Ok(None) => break,
                Err(err) => {
                    if let Some(id) = self.in_flight {
                        tracing::error!("decision worker unavailable: {err}");
                        self.resolve(DecisionReply::fallback(id, err.to_string()));
                    }
                    break;
                }
            }
        }

        if let Some(request) = self.session.poll_due(Instant::now()) {
            let id = request.id;
            self.in_flight = Some(id);
            if let Err(err) = self.worker.submit(request) {
                tracing::error!("failed to submit decision request: {err}");
                self.resolve(DecisionReply::fallback(id, err.to_string()));
            }
        }
    }

    fn resolve(&mut self, reply: DecisionReply) {
        if self.in_flight == Some(reply.id) {
            self.in_flight = None;
        }
        self.session.apply_decision(reply, Instant::now());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(backend) = cli.backend {
        config.decision.backend = backend;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.validate()?;

    let log_target = match (&cli.log_file, cli.headless) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::File(PathBuf::from(logging::DEFAULT_LOG_FILE)),
    };
    logging::init(log_target)?;

    let client = agent::build_client(&config.decision).context("building decision backend")?;
    let worker = DecisionWorker::spawn(client).context("spawning decision worker")?;

    let rng = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "using fixed seed");
            RandomNumberGenerator::seeded(seed)
        }
        None => RandomNumberGenerator::new(),
    };
    let mut session = Session::new(rng, config.timing.loop_timing());

    if cli.headless {
        let summary = headless::run(&mut session, &worker)?;
        println!(
            "Run finished after {} ticks; furthest room: {}.",
            summary.ticks, summary.furthest_room
        );
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Theatre of Blood Bot")
        .build()
        .map_err(|e| anyhow!("{e}"))?;
    let state = TheatreBotState {
        session,
        worker,
        in_flight: None,
        frame: 0,
    };
    main_loop(context, state).map_err(|e| anyhow!("{e}"))
}
