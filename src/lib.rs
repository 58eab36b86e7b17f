// In: src/lib.rs

//! Pokemon Battle Simulator
//!
//! A deterministic-when-seeded, one-move-each battle engine over PokeAPI data,
//! exposed as MCP tools and a small command-line front end.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mcp_interface;
pub mod metrics;
pub mod pokeapi;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{PokemonType, StatusCondition};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::combatant::{BaseStats, CombatMove, Combatant};
pub use battle::engine::{simulate, BattleOptions, BattleOutcome, BattleReport};
pub use battle::state::{BattleEvent, BattleRng, BattleState, GameState, SeededRng, TurnRng};

// Data source and tool surface.
pub use mcp_interface::{simulate_battle, BattleSummary};
pub use pokeapi::{CombatantSource, PokeApiClient, PokemonInfo};

// Crate-specific error and result types.
pub use config::Settings;
pub use errors::{ConfigError, ConfigResult, FetchError, FetchResult, ServiceError};
pub use metrics::{MetricsSnapshot, ToolMetrics};
