use clap::{Parser, Subcommand};
use evo_automata::checkpoint;
use evo_automata::config::Config;
use evo_automata::server;
use evo_automata::session::Session;
use evo_automata::trainer;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "evo-automata")]
#[command(about = "Evolving finite-state automata on a toroidal grid", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Breed generations headless and save the result
    Train {
        #[arg(long)]
        generations: Option<u64>,

        #[arg(long)]
        snapshot: Option<PathBuf>,

        #[arg(long)]
        no_checkpoint: bool,
    },
    /// Run one session behind the WebSocket server
    Serve {
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = if std::path::Path::new(&args.config).exists() {
        log::info!("Loading config from: {}", args.config);
        Config::load_from_file(&args.config)?
    } else {
        log::info!("Config file not found, using defaults and saving to: {}", args.config);
        let config = Config::default();
        config.save_to_file(&args.config)?;
        config
    };

    match args.command {
        Command::Train {
            generations,
            snapshot,
            no_checkpoint,
        } => {
            if no_checkpoint {
                config.checkpoint.enabled = false;
            }
            let generations = generations.unwrap_or(config.trainer.generations);
            let snapshot =
                snapshot.unwrap_or_else(|| PathBuf::from(&config.trainer.snapshot_path));

            log::info!("Training for {} generations", generations);
            let summary = tokio::task::spawn_blocking(move || {
                trainer::run(&config, &snapshot, generations)
            })
            .await??;
            log::info!("Finished {} generations", summary.generations);
        }
        Command::Serve { snapshot } => {
            let session = match snapshot {
                Some(path) if path.exists() => {
                    log::info!("Loading snapshot from: {:?}", path);
                    let game = checkpoint::load_snapshot(&path, &config)?;
                    Session::with_game(config.clone(), game)
                }
                _ if config.checkpoint.enabled => match checkpoint::load_latest_checkpoint(&config)? {
                    Some(game) => Session::with_game(config.clone(), game),
                    None => Session::new(config.clone())?,
                },
                _ => Session::new(config.clone())?,
            };
            let session = Arc::new(RwLock::new(session));

            if config.server.enabled {
                let server_session = session.clone();
                let server_config = config.clone();
                tokio::spawn(async move {
                    if let Err(e) = server::run_server(server_config, server_session).await {
                        log::error!("Server error: {}", e);
                    }
                });
                log::info!(
                    "WebSocket server started on {}:{}",
                    config.server.address,
                    config.server.port
                );
            }

            run_simulation(session, config).await?;
        }
    }

    Ok(())
}

/// Drives the shared session on a timer when automatic ticking is on;
/// otherwise the session only moves on client commands.
async fn run_simulation(
    session: Arc<RwLock<Session>>,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.simulation.ticks_per_second == 0 {
        log::info!("Automatic ticking disabled, waiting for commands");
        tokio::signal::ctrl_c().await?;
        return Ok(());
    }

    let tick_duration = Duration::from_millis((1000 / config.simulation.ticks_per_second).max(1));
    let mut tick_interval = interval(tick_duration);

    let mut last_log = Instant::now();
    let log_interval = Duration::from_secs(10);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                log::info!("Shutting down");
                return Ok(());
            }
        }

        let mut state = session.write().await;

        if state.game().is_everyone_dead() {
            if !config.simulation.auto_advance {
                continue;
            }

            let summary = state.advance_generation()?;
            log::info!(
                "Generation {} finished after {} ticks | Max Lifetime: {}",
                summary.metrics.generation,
                summary.metrics.tick,
                summary.metrics.max_lifetime
            );

            if config.checkpoint.enabled
                && config.checkpoint.interval_generations > 0
                && state.generation() % config.checkpoint.interval_generations == 0
            {
                match checkpoint::save_checkpoint(state.game(), &config) {
                    Ok(path) => log::info!("Checkpoint saved: {:?}", path),
                    Err(e) => log::error!("Failed to save checkpoint: {}", e),
                }
            }
            continue;
        }

        state.step();

        if last_log.elapsed() >= log_interval {
            let metrics = state.metrics();
            log::info!(
                "Generation: {} | Tick: {} | Alive: {}/{} | Avg Health: {:.2} | Food: {}",
                metrics.generation,
                metrics.tick,
                metrics.alive,
                metrics.population,
                metrics.avg_health,
                metrics.total_food
            );
            last_log = Instant::now();
        }
    }
}
