//! Command-line front end.
//!
//! ```text
//! poke-battle battle <pokemon1> <pokemon2> [--seed N]
//! poke-battle info <pokemon>
//! ```

use poke_battle::config::Settings;
use poke_battle::errors::ServiceError;
use poke_battle::mcp_interface::{get_pokemon_info, run_tool, simulate_battle};
use poke_battle::metrics::ToolMetrics;
use poke_battle::pokeapi::PokeApiClient;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "usage:\n  poke-battle battle <pokemon1> <pokemon2> [--seed N]\n  poke-battle info <pokemon>";

enum Command {
    Battle {
        pokemon1: String,
        pokemon2: String,
        seed: Option<u64>,
    },
    Info {
        pokemon: String,
    },
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args {
        [cmd, rest @ ..] if cmd == "battle" => {
            let mut names = Vec::new();
            let mut seed = None;
            let mut iter = rest.iter();
            while let Some(arg) = iter.next() {
                if arg == "--seed" {
                    let value = iter.next().ok_or("--seed needs a value")?;
                    seed = Some(
                        value
                            .parse::<u64>()
                            .map_err(|_| format!("invalid seed: {}", value))?,
                    );
                } else {
                    names.push(arg.clone());
                }
            }
            match <[String; 2]>::try_from(names) {
                Ok([pokemon1, pokemon2]) => Ok(Command::Battle {
                    pokemon1,
                    pokemon2,
                    seed,
                }),
                Err(_) => Err("battle needs exactly two pokemon".to_string()),
            }
        }
        [cmd, pokemon] if cmd == "info" => Ok(Command::Info {
            pokemon: pokemon.clone(),
        }),
        _ => Err(USAGE.to_string()),
    }
}

async fn run(command: Command, settings: &Settings) -> Result<(), ServiceError> {
    let metrics = Arc::new(ToolMetrics::new(settings.metrics.enabled));
    let client = PokeApiClient::new(&settings.pokeapi)?.with_metrics(Arc::clone(&metrics));

    match command {
        Command::Battle {
            pokemon1,
            pokemon2,
            seed,
        } => {
            let summary = run_tool(
                &metrics,
                "simulate_battle",
                simulate_battle(&client, &pokemon1, &pokemon2, seed, &settings.battle),
            )
            .await?;
            println!("{}", summary.to_text());
        }
        Command::Info { pokemon } => {
            let info = run_tool(&metrics, "get_pokemon_info", get_pokemon_info(&client, &pokemon)).await?;
            println!("{} (#{}) [{}]", info.name, info.id, info.types.join("/"));
            for (stat, value) in info.base_stats.iter() {
                println!("  {}: {}", stat, value);
            }
            println!("Abilities:");
            for ability in &info.abilities {
                println!("  {}: {}", ability.name, ability.effect.as_deref().unwrap_or("-"));
            }
            println!("Moves:");
            for entry in &info.moves {
                println!("  {}: {}", entry.name, entry.effect.as_deref().unwrap_or("-"));
            }
            println!("Evolution: {}", info.evolution_chain.join(" -> "));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = poke_battle::logging::init(&settings.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
