//! Binary entrypoint for the SuperAdventure CLI.
//!
//! Commands:
//! - `play [--seed <n>]` - load or create the player and play on stdin/stdout
//! - `init` - write a starter `config.toml`
//! - `status` - print the saved player's stats and quest log
//!
//! See the library crate docs for module-level details: `superadventure::`.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::{self, BufRead, Write};

use superadventure::adventure::{
    format_inventory, format_quest_log, load_or_default, load_player, load_world_from_json,
    Controller, RandomDice, World,
};
use superadventure::config::Config;
use superadventure::session::GameSession;

#[derive(Parser)]
#[command(name = "superadventure")]
#[command(about = "A small text adventure with quests, monsters and loot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game on this terminal
    Play {
        /// Fixed dice seed, overriding [game].seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a default configuration file
    Init,
    /// Show the saved player
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => Some(Config::load_or_default(&cli.config)?),
    };
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Play { seed } => {
            let config = config.unwrap_or_default();
            play(&config, seed)?;
        }
        Commands::Init => {
            if std::path::Path::new(&cli.config).exists() {
                warn!("{} already exists, leaving it alone", cli.config);
                println!("{} already exists.", cli.config);
            } else {
                Config::create_default(&cli.config)?;
                println!("Wrote default configuration to {}", cli.config);
            }
        }
        Commands::Status => {
            let config = config.unwrap_or_default();
            status(&config)?;
        }
    }

    Ok(())
}

fn load_world(config: &Config) -> Result<World> {
    match &config.game.world_file {
        Some(path) => load_world_from_json(path)
            .with_context(|| format!("Failed to load world file {}", path)),
        None => Ok(World::standard()),
    }
}

fn play(config: &Config, seed_override: Option<u64>) -> Result<()> {
    let world = load_world(config)?;
    let rules = config.game.rules();
    rules
        .validate(&world)
        .context("[game] settings do not match the world")?;
    let save_file = &config.storage.save_file;
    let player = load_or_default(save_file, &world, &rules)
        .with_context(|| format!("Failed to load save {}", save_file))?;

    let dice = match seed_override.or(config.game.seed) {
        Some(seed) => {
            info!("Using dice seed {}", seed);
            RandomDice::seeded(seed)
        }
        None => RandomDice::from_entropy(),
    };
    let controller = Controller::new(&world, dice, rules);
    let mut session = GameSession::new(controller, player, save_file);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in session.start()? {
        writeln!(out, "{}", line)?;
    }

    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut buf = String::new();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            info!("End of input, saving and leaving");
            break;
        }
        let reply = match session.handle(&buf) {
            Ok(reply) => reply,
            Err(e) => {
                if let Err(save_err) = session.save() {
                    warn!("Could not save after error: {}", save_err);
                }
                return Err(e).context("Game stopped on an error");
            }
        };
        for line in &reply.lines {
            writeln!(out, "{}", line)?;
        }
        if reply.quit {
            break;
        }
    }

    session
        .save()
        .with_context(|| format!("Failed to write save {}", session.save_path().display()))?;
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let world = load_world(config)?;
    config
        .game
        .rules()
        .validate(&world)
        .context("[game] settings do not match the world")?;
    let save_file = &config.storage.save_file;
    if !std::path::Path::new(save_file).exists() {
        println!("No saved game at {}", save_file);
        return Ok(());
    }
    let player = load_player(save_file, &world)
        .with_context(|| format!("Failed to load save {}", save_file))?;
    let location = world.location(player.current_location)?;

    println!("SuperAdventure v{}", env!("CARGO_PKG_VERSION"));
    println!("Save: {}", save_file);
    println!(
        "Level {} | HP {}/{} | XP {} | Gold {}",
        player.level(),
        player.current_hit_points,
        player.maximum_hit_points(),
        player.experience_points,
        player.gold
    );
    println!("Location: {}", location.name);
    println!("Inventory:");
    for line in format_inventory(&player, &world) {
        println!("  {}", line);
    }
    println!("Quests:");
    for line in format_quest_log(&player, &world) {
        println!("  {}", line);
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity wins over the configured level
    let configured = config
        .as_ref()
        .and_then(|cfg| cfg.logging.level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Warn);
    let level = match verbosity {
        0 => configured,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });
    match log_file {
        Some(f) => {
            // Game text owns the terminal; file logging stays in the file
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            builder.format(move |_fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{} [{}] {}", ts, record.level(), record.args());
                }
                Ok(())
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}
