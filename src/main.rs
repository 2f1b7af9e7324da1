use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Env, Target};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use snake_modes::agent::{Agent, GreedyAgent, RandomAgent};
use snake_modes::game::GameConfig;
use snake_modes::modes::{AgentConfig, AgentMode, DEFAULT_TICK, HumanMode};

#[derive(Parser)]
#[command(name = "snake_modes")]
#[command(version, about = "Snake for people and for agents")]
struct Cli {
    /// Who is playing
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Policy used in agent mode
    #[arg(long, default_value = "greedy")]
    agent: AgentKind,

    /// Episodes to play in agent mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Run agent mode without drawing
    #[arg(long)]
    headless: bool,

    /// Turn off the greedy agent's early random moves
    #[arg(long)]
    no_explore: bool,

    /// Board width
    #[arg(long)]
    width: Option<i32>,

    /// Board height
    #[arg(long)]
    height: Option<i32>,

    /// Cell size
    #[arg(long)]
    block_size: Option<i32>,

    /// Seed for food placement and agents
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game config; command-line options override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write episode statistics to this JSON file
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Send log output to a file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Milliseconds per tick when drawing
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Let a policy play
    Agent,
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Steer toward food, avoid danger
    Greedy,
    /// Uniformly random actions
    Random,
}

impl Cli {
    fn draws(&self) -> bool {
        self.mode == Mode::Human || !self.headless
    }

    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        Ok(config)
    }

    fn build_agent(&self) -> Box<dyn Agent> {
        match self.agent {
            AgentKind::Greedy => {
                let agent = GreedyAgent::new(self.seed);
                if self.no_explore {
                    Box::new(agent.without_exploration())
                } else {
                    Box::new(agent)
                }
            }
            AgentKind::Random => Box::new(RandomAgent::new(self.seed)),
        }
    }
}

/// Logs go to stderr, which the terminal renderer also draws on, so drawing
/// modes stay quiet unless RUST_LOG or a log file asks otherwise.
fn init_logging(log_file: Option<&Path>, draws: bool) -> Result<()> {
    let default_filter = if draws && log_file.is_none() {
        "off"
    } else {
        "info"
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {:?}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Failed to initialize logging")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref(), cli.draws())?;

    let config = cli.game_config()?;

    match cli.mode {
        Mode::Human => {
            let tick = cli.tick_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TICK);
            let mut human_mode = HumanMode::new(config, tick)?;
            let score = human_mode.run().await?;
            println!("Final Score {score}");
        }
        Mode::Agent => {
            let mut agent_config = AgentConfig {
                episodes: cli.episodes,
                stats_path: cli.stats_out.clone(),
                ..AgentConfig::default()
            };
            if let Some(ms) = cli.tick_ms {
                agent_config.tick_interval = Duration::from_millis(ms);
            }

            let mut agent_mode = AgentMode::new(config, cli.build_agent(), agent_config)?;
            if cli.headless {
                agent_mode.run()?;
            } else {
                agent_mode.run_watched().await?;
            }

            println!("{}", agent_mode.stats().summary());
        }
    }

    Ok(())
}
