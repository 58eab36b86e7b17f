//! Pokemon Battle MCP Server
//!
//! A Model Context Protocol server over stdio that exposes PokeAPI lookups and
//! the battle simulator as tools.

use std::sync::Arc;

use poke_battle::battle::engine::BattleOptions;
use poke_battle::config::Settings;
use poke_battle::errors::FetchError;
use poke_battle::mcp_interface::{get_pokemon_info, get_server_metrics, run_tool, simulate_battle};
use poke_battle::metrics::ToolMetrics;
use poke_battle::pokeapi::PokeApiClient;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use tokio::io::{stdin, stdout};
use tracing::info;

#[derive(Debug, Clone)]
pub struct PokeBattleService {
    tool_router: ToolRouter<PokeBattleService>,
    client: PokeApiClient,
    metrics: Arc<ToolMetrics>,
    battle_options: BattleOptions,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PokemonInfoRequest {
    #[schemars(description = "Name of the Pokemon to look up, e.g. 'pikachu'")]
    pub pokemon_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SimulateBattleRequest {
    #[schemars(description = "Name of the first Pokemon")]
    pub pokemon1: String,
    #[schemars(description = "Name of the second Pokemon")]
    pub pokemon2: String,
    #[schemars(description = "Optional seed; the same seed and Pokemon replay the same battle")]
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Pretty JSON for a tool result.
fn json_content<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Could not encode result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn fetch_failure(err: FetchError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(err.to_string())])
}

#[tool_router]
impl PokeBattleService {
    pub fn new(client: PokeApiClient, metrics: Arc<ToolMetrics>, battle_options: BattleOptions) -> Self {
        Self {
            tool_router: Self::tool_router(),
            client,
            metrics,
            battle_options,
        }
    }

    #[tool(description = "Get base stats, types, abilities, moves (with effects) and the evolution chain of a Pokemon")]
    async fn get_pokemon_info(
        &self,
        Parameters(request): Parameters<PokemonInfoRequest>,
    ) -> Result<CallToolResult, McpError> {
        match run_tool(
            &self.metrics,
            "get_pokemon_info",
            get_pokemon_info(&self.client, &request.pokemon_name),
        )
        .await
        {
            Ok(info) => json_content(&info),
            Err(e) => Ok(fetch_failure(e)),
        }
    }

    #[tool(description = "Simulate a battle between two Pokemon, each using its first move")]
    async fn simulate_battle(
        &self,
        Parameters(request): Parameters<SimulateBattleRequest>,
    ) -> Result<CallToolResult, McpError> {
        match run_tool(
            &self.metrics,
            "simulate_battle",
            simulate_battle(
                &self.client,
                &request.pokemon1,
                &request.pokemon2,
                request.seed,
                &self.battle_options,
            ),
        )
        .await
        {
            Ok(summary) => json_content(&summary),
            Err(e) => Ok(fetch_failure(e)),
        }
    }

    #[tool(description = "Get tool call and PokeAPI request counters for this server")]
    async fn get_server_metrics(&self) -> Result<CallToolResult, McpError> {
        json_content(&get_server_metrics(&self.metrics))
    }
}

#[tool_handler]
impl ServerHandler for PokeBattleService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Look up Pokemon with get_pokemon_info and pit two against each other with simulate_battle."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    poke_battle::logging::init(&settings.logging)?;

    info!(
        server = %settings.server.name,
        version = %settings.server.version,
        environment = %settings.server.environment,
        "starting MCP server"
    );

    let metrics = Arc::new(ToolMetrics::new(settings.metrics.enabled));
    let client = PokeApiClient::new(&settings.pokeapi)?.with_metrics(Arc::clone(&metrics));
    let service = PokeBattleService::new(client, metrics, settings.battle);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    let quit_reason = server.waiting().await?;

    info!(reason = ?quit_reason, "MCP server exiting");
    Ok(())
}
