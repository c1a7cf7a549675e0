//! Binary entrypoint for the Chronicles CLI.
//!
//! Commands:
//! - `new <name> <class>` - create and save a level 1 character
//! - `play <name>` - load a character and open the menu loop
//! - `list` - list saved characters
//! - `delete <name>` - remove a save
//! - `inspect <name> [--json]` - print a saved character
//! - `init-data` - write the starter quest and item files
mod menu;

use anyhow::{bail, Context, Result};
use chronicles::build_info;
use chronicles::character::{validate_name, SaveStore};
use chronicles::data::write_default_data;
use chronicles::session::load_catalogs;
use chronicles::{Character, Config, GameSession};
use clap::{Parser, Subcommand};
use log::info;
use menu::Menu;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chronicles")]
#[command(about = "A text-driven single-player RPG")]
#[command(version, long_version = build_info::LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new character
    New {
        name: String,
        /// Warrior, Mage, Rogue or Cleric
        class: String,
    },
    /// Play a saved character
    Play { name: String },
    /// List saved characters
    List,
    /// Delete a saved character
    Delete { name: String },
    /// Show a saved character
    Inspect {
        name: String,
        /// Print the character as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the starter quest and item data files
    InitData,
}

fn init_logging(config: &Config, verbosity: u8) {
    let level = match verbosity {
        0 => config.log_level(),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    init_logging(&config, cli.verbose);

    let store = SaveStore::new(&config.paths.save_dir);

    match cli.command {
        Commands::New { name, class } => {
            validate_name(&name)?;
            let name = name.trim().to_string();
            if store.exists(&name) {
                bail!("a character named {} already exists", name);
            }
            let character = Character::create(name, &class)?;
            let path = store.save(&character)?;
            info!("created {} at {}", character.name, path.display());
            println!(
                "Created {} the {} (HP {}, STR {}, MAG {}, {} gold).",
                character.name,
                character.class,
                character.max_health,
                character.strength,
                character.magic,
                character.gold
            );
        }
        Commands::Play { name } => {
            let character = store.load(&name)?;
            write_default_data(&config.paths.data_dir)?;
            let (quests, items) = load_catalogs(&config.paths.data_dir).with_context(|| {
                format!("failed to load game data from {}", config.paths.data_dir.display())
            })?;
            let session = GameSession::new(character, quests, items)
                .with_revive_cost(config.game.revive_cost);

            let stdin = io::stdin();
            let menu = Menu::new(session, store, stdin.lock(), io::stdout());
            let session = menu.run(&mut rand::thread_rng())?;
            println!("Farewell, {}.", session.character().name);
        }
        Commands::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No saved characters in {}.", store.dir().display());
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted {}.", name);
        }
        Commands::Inspect { name, json } => {
            let character = store.load(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&character)?);
            } else {
                print!("{}", chronicles::character::serialize_character(&character));
            }
        }
        Commands::InitData => {
            let written = write_default_data(&config.paths.data_dir)?;
            println!(
                "Wrote {} data file(s) to {}.",
                written,
                config.paths.data_dir.display()
            );
        }
    }

    Ok(())
}
