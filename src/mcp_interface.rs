//! Tool operations shared by the MCP server and the command-line binary.
//!
//! Each operation is timed, logged and recorded in the caller's `ToolMetrics`.

use crate::battle::engine::{simulate, BattleOptions, BattleOutcome, BattleReport};
use crate::battle::state::SeededRng;
use crate::errors::FetchResult;
use crate::metrics::{CallOutcome, MetricsSnapshot, ToolMetrics};
use crate::pokeapi::{CombatantSource, PokeApiClient, PokemonInfo};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info};

/// Result of the `simulate_battle` tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSummary {
    pub pokemon1: String,
    pub pokemon2: String,
    pub initial_hp: BTreeMap<String, u32>,
    pub battle_log: Vec<String>,
    pub winner: Option<String>,
    pub turns: u32,
    /// `victory` or `stalemate`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl BattleSummary {
    pub fn from_report(report: BattleReport, seed: Option<u64>) -> Self {
        let winner = report.winner().map(str::to_string);
        let outcome = match report.outcome {
            BattleOutcome::Victory { .. } => "victory",
            BattleOutcome::Stalemate { .. } => "stalemate",
        };
        let [pokemon1, pokemon2] = report.participants;
        Self {
            pokemon1,
            pokemon2,
            initial_hp: report.initial_hp,
            battle_log: report.battle_log,
            winner,
            turns: report.turns,
            outcome: outcome.to_string(),
            seed,
        }
    }

    /// The battle log followed by a one-line result.
    pub fn to_text(&self) -> String {
        let mut text = format!("{} vs {}\n", self.pokemon1, self.pokemon2);
        for line in &self.battle_log {
            text.push_str(line);
            text.push('\n');
        }
        match &self.winner {
            Some(winner) => text.push_str(&format!("{} won in {} turns.", winner, self.turns)),
            None => text.push_str(&format!("Stalemate after {} turns.", self.turns)),
        }
        text
    }
}

/// Runs `operation`, logging and recording how it went under `tool`.
pub async fn run_tool<T, F>(metrics: &ToolMetrics, tool: &str, operation: F) -> FetchResult<T>
where
    F: Future<Output = FetchResult<T>>,
{
    let started = Instant::now();
    info!(tool, "tool called");
    let result = operation.await;
    let duration = started.elapsed();

    match &result {
        Ok(_) => {
            metrics.record_tool_call(tool, duration, CallOutcome::Success);
            info!(tool, duration_ms = duration.as_millis() as u64, "tool completed");
        }
        Err(err) => {
            metrics.record_tool_call(tool, duration, CallOutcome::Error);
            error!(tool, kind = err.kind(), error = %err, "tool failed");
        }
    }
    result
}

/// Fetches both combatants concurrently and battles them.
///
/// A failed fetch aborts before the first turn; when both fail the first
/// creature's error is reported.
pub async fn simulate_battle<S: CombatantSource>(
    source: &S,
    pokemon1: &str,
    pokemon2: &str,
    seed: Option<u64>,
    options: &BattleOptions,
) -> FetchResult<BattleSummary> {
    let (first, second) = tokio::join!(
        source.fetch_combatant(pokemon1),
        source.fetch_combatant(pokemon2)
    );
    let first = first?;
    let second = second?;

    let mut rng = match seed {
        Some(seed) => SeededRng::from_seed(seed),
        None => SeededRng::new_random(),
    };
    let report = simulate(first, second, &mut rng, options);
    Ok(BattleSummary::from_report(report, seed))
}

pub async fn get_pokemon_info(client: &PokeApiClient, pokemon_name: &str) -> FetchResult<PokemonInfo> {
    client.fetch_pokemon_info(pokemon_name).await
}

pub fn get_server_metrics(metrics: &ToolMetrics) -> MetricsSnapshot {
    metrics.snapshot()
}
