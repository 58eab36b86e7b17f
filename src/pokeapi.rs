//! PokeAPI client: turns remote creature and move records into battle-ready combatants.
//!
//! Only the response fields the battle and the info tool read are modelled;
//! everything else in the JSON is ignored.

use crate::battle::combatant::{BaseStats, CombatMove, Combatant};
use crate::config::PokeApiSettings;
use crate::errors::{FetchError, FetchResult};
use crate::metrics::ToolMetrics;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const FALLBACK_MOVE_NAME: &str = "tackle";
const FALLBACK_MOVE_TYPE: &str = "normal";
const EFFECT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlResource {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeEntry {
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilityEntry {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectEntry {
    pub effect: String,
    pub language: NamedResource,
}

/// `GET /pokemon/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilityEntry>,
    pub species: NamedResource,
}

/// `GET /move/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRecord {
    pub name: Option<String>,
    pub power: Option<u32>,
    #[serde(rename = "type")]
    pub move_type: Option<NamedResource>,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

/// `GET /ability/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct AbilityRecord {
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesRecord {
    pub evolution_chain: UrlResource,
}

/// `GET /evolution-chain/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainRecord {
    pub chain: ChainLink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEffect {
    pub name: String,
    pub effect: Option<String>,
}

/// Result of the `get_pokemon_info` tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonInfo {
    pub name: String,
    pub id: u32,
    pub base_stats: BaseStats,
    pub types: Vec<String>,
    pub abilities: Vec<NamedEffect>,
    pub moves: Vec<NamedEffect>,
    pub evolution_chain: Vec<String>,
}

/// Anything that can produce a combatant by name.
pub trait CombatantSource {
    fn fetch_combatant(&self, name: &str) -> impl Future<Output = FetchResult<Combatant>> + Send;
}

/// First English effect text, if any.
pub fn english_effect(entries: &[EffectEntry]) -> Option<String> {
    entries
        .iter()
        .find(|entry| entry.language.name == EFFECT_LANGUAGE)
        .map(|entry| entry.effect.clone())
}

pub fn base_stats_from(stats: &[StatEntry]) -> BaseStats {
    stats
        .iter()
        .map(|entry| (entry.stat.name.clone(), entry.base_stat))
        .collect()
}

pub fn type_names(types: &[TypeEntry]) -> Vec<String> {
    types.iter().map(|entry| entry.type_ref.name.clone()).collect()
}

/// Null power stays absent; a missing type or name falls back to `normal` / `tackle`.
pub fn combat_move_from(record: &MoveRecord) -> CombatMove {
    CombatMove::new(
        record.name.as_deref().unwrap_or(FALLBACK_MOVE_NAME),
        record.power,
        record
            .move_type
            .as_ref()
            .map_or(FALLBACK_MOVE_TYPE, |t| t.name.as_str()),
        english_effect(&record.effect_entries).as_deref(),
    )
}

pub fn combatant_from_records(pokemon: &PokemonRecord, first_move: &MoveRecord) -> Combatant {
    Combatant::new(
        &pokemon.name,
        base_stats_from(&pokemon.stats),
        type_names(&pokemon.types),
        combat_move_from(first_move),
    )
}

/// Species names along the chain, following the first branch at each stage.
pub fn parse_evolution_chain(chain: &ChainLink) -> Vec<String> {
    let mut names = vec![chain.species.name.clone()];
    let mut current = chain;
    while let Some(next) = current.evolves_to.first() {
        names.push(next.species.name.clone());
        current = next;
    }
    names
}

/// What a request is for. Decides which error a failed status turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRole {
    /// `/pokemon/{name}`: 404 means the creature does not exist.
    Creature,
    /// The first listed move of a combatant: any failure means no usable move.
    BattleMove,
    /// Supporting lookups for the info tool, named by endpoint.
    Detail(&'static str),
}

impl RequestRole {
    pub fn endpoint(self) -> &'static str {
        match self {
            RequestRole::Creature => "pokemon",
            RequestRole::BattleMove => "move",
            RequestRole::Detail(endpoint) => endpoint,
        }
    }
}

/// Maps a response status onto the error the caller sees. `name` is the creature asked for.
pub fn classify_status(role: RequestRole, name: &str, status: StatusCode) -> FetchResult<()> {
    if status.is_success() {
        return Ok(());
    }
    match role {
        RequestRole::Creature if status == StatusCode::NOT_FOUND => {
            Err(FetchError::NotFound(name.to_string()))
        }
        RequestRole::BattleMove => Err(FetchError::NoMoveData(name.to_string())),
        RequestRole::Creature | RequestRole::Detail(_) => Err(FetchError::Unavailable(format!(
            "{} endpoint returned {}",
            role.endpoint(),
            status
        ))),
    }
}

/// Decodes a response body; anything malformed means the source is unavailable.
pub fn decode_body<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> FetchResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        FetchError::Unavailable(format!("malformed {} response: {}", endpoint, e))
    })
}

/// The move a combatant fights with: the first one the source lists.
pub fn first_move<'a>(pokemon: &'a PokemonRecord, name: &str) -> FetchResult<&'a MoveEntry> {
    pokemon
        .moves
        .first()
        .ok_or_else(|| FetchError::NoMoveData(name.to_string()))
}

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
    info_move_limit: usize,
    metrics: Option<Arc<ToolMetrics>>,
}

impl PokeApiClient {
    pub fn new(settings: &PokeApiSettings) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("poke-battle/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, settings))
    }

    /// Client over an already configured `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, settings: &PokeApiSettings) -> Self {
        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            info_move_limit: settings.info_move_limit,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<ToolMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn pokemon_url(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }

    fn record(&self, endpoint: &str, status: Option<StatusCode>) {
        if let Some(metrics) = &self.metrics {
            metrics.record_pokeapi_request(endpoint, status.map(|s| s.as_u16()));
        }
    }

    /// GET, record, classify the status and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        role: RequestRole,
        name: &str,
        url: &str,
    ) -> FetchResult<T> {
        let endpoint = role.endpoint();
        debug!(endpoint, url, "pokeapi request");
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                self.record(endpoint, None);
                return Err(err.into());
            }
        };
        let status = response.status();
        self.record(endpoint, Some(status));

        if let Err(err) = classify_status(role, name, status) {
            warn!(pokemon = name, endpoint, status = status.as_u16(), "pokeapi request failed");
            return Err(err);
        }
        let body = response.bytes().await?;
        decode_body(endpoint, &body)
    }

    async fn fetch_pokemon_record(&self, name: &str) -> FetchResult<PokemonRecord> {
        let lookup = name.trim().to_lowercase();
        if lookup.is_empty() {
            return Err(FetchError::NotFound(name.to_string()));
        }
        let url = self.pokemon_url(&lookup);
        info!(pokemon = name, url = %url, "fetching pokemon data");
        self.get_json(RequestRole::Creature, name, &url).await
    }

    /// Stats, types and the first listed move of the named creature.
    pub async fn fetch_combatant(&self, name: &str) -> FetchResult<Combatant> {
        let pokemon = self.fetch_pokemon_record(name).await?;
        let entry = first_move(&pokemon, name)?;
        let move_record: MoveRecord = self
            .get_json(RequestRole::BattleMove, name, &entry.move_ref.url)
            .await?;

        let combatant = combatant_from_records(&pokemon, &move_record);
        info!(combatant = %combatant, "pokemon data fetched");
        Ok(combatant)
    }

    /// Stats, types, abilities, the first few moves and the evolution line.
    pub async fn fetch_pokemon_info(&self, name: &str) -> FetchResult<PokemonInfo> {
        let pokemon = self.fetch_pokemon_record(name).await?;

        let mut abilities = Vec::with_capacity(pokemon.abilities.len());
        for entry in &pokemon.abilities {
            let record: AbilityRecord = self
                .get_json(RequestRole::Detail("ability"), name, &entry.ability.url)
                .await?;
            abilities.push(NamedEffect {
                name: entry.ability.name.clone(),
                effect: english_effect(&record.effect_entries),
            });
        }

        let mut moves = Vec::new();
        for entry in pokemon.moves.iter().take(self.info_move_limit) {
            let record: MoveRecord = self
                .get_json(RequestRole::Detail("move"), name, &entry.move_ref.url)
                .await?;
            moves.push(NamedEffect {
                name: entry.move_ref.name.clone(),
                effect: english_effect(&record.effect_entries),
            });
        }

        let species: SpeciesRecord = self
            .get_json(RequestRole::Detail("species"), name, &pokemon.species.url)
            .await?;
        let evolution: EvolutionChainRecord = self
            .get_json(
                RequestRole::Detail("evolution-chain"),
                name,
                &species.evolution_chain.url,
            )
            .await?;

        Ok(PokemonInfo {
            name: pokemon.name.clone(),
            id: pokemon.id,
            base_stats: base_stats_from(&pokemon.stats),
            types: type_names(&pokemon.types),
            abilities,
            moves,
            evolution_chain: parse_evolution_chain(&evolution.chain),
        })
    }
}

impl CombatantSource for PokeApiClient {
    async fn fetch_combatant(&self, name: &str) -> FetchResult<Combatant> {
        PokeApiClient::fetch_combatant(self, name).await
    }
}
