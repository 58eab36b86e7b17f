//! Per-service call and request counters.
//!
//! A `ToolMetrics` lives inside the service instance that records into it;
//! nothing here is process-global.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolCallStats {
    pub success: u64,
    pub error: u64,
    pub total_duration_ms: f64,
}

impl ToolCallStats {
    pub fn calls(&self) -> u64 {
        self.success + self.error
    }
}

/// Serializable copy of everything recorded so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub tool_calls: BTreeMap<String, ToolCallStats>,
    /// endpoint -> HTTP status (or "error" for transport failures) -> count
    pub pokeapi_requests: BTreeMap<String, BTreeMap<String, u64>>,
}

#[derive(Debug)]
pub struct ToolMetrics {
    enabled: bool,
    inner: Mutex<MetricsSnapshot>,
}

impl ToolMetrics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_tool_call(&self, tool: &str, duration: Duration, outcome: CallOutcome) {
        if !self.enabled {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let stats = inner.tool_calls.entry(tool.to_string()).or_default();
        match outcome {
            CallOutcome::Success => stats.success += 1,
            CallOutcome::Error => stats.error += 1,
        }
        stats.total_duration_ms += duration.as_secs_f64() * 1000.0;
    }

    /// `status` is `None` when the request never produced a response.
    pub fn record_pokeapi_request(&self, endpoint: &str, status: Option<u16>) {
        if !self.enabled {
            return;
        }
        let status_key = status.map_or_else(|| "error".to_string(), |code| code.to_string());
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *inner
            .pokeapi_requests
            .entry(endpoint.to_string())
            .or_default()
            .entry(status_key)
            .or_default() += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ToolMetrics {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tool_calls_split_by_outcome() {
        let metrics = ToolMetrics::new(true);
        metrics.record_tool_call("simulate_battle", Duration::from_millis(40), CallOutcome::Success);
        metrics.record_tool_call("simulate_battle", Duration::from_millis(10), CallOutcome::Error);
        metrics.record_tool_call("get_pokemon_info", Duration::from_millis(5), CallOutcome::Success);

        let snapshot = metrics.snapshot();
        let battle = &snapshot.tool_calls["simulate_battle"];
        assert_eq!(battle.success, 1);
        assert_eq!(battle.error, 1);
        assert_eq!(battle.calls(), 2);
        assert!((battle.total_duration_ms - 50.0).abs() < 1e-6);
        assert_eq!(snapshot.tool_calls["get_pokemon_info"].calls(), 1);
    }

    #[test]
    fn test_pokeapi_requests_by_status() {
        let metrics = ToolMetrics::new(true);
        metrics.record_pokeapi_request("pokemon", Some(200));
        metrics.record_pokeapi_request("pokemon", Some(200));
        metrics.record_pokeapi_request("pokemon", Some(404));
        metrics.record_pokeapi_request("move", None);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.pokeapi_requests["pokemon"]["200"], 2);
        assert_eq!(snapshot.pokeapi_requests["pokemon"]["404"], 1);
        assert_eq!(snapshot.pokeapi_requests["move"]["error"], 1);
    }

    #[test]
    fn test_disabled_metrics_record_nothing() {
        let metrics = ToolMetrics::new(false);
        metrics.record_tool_call("simulate_battle", Duration::from_millis(1), CallOutcome::Success);
        metrics.record_pokeapi_request("pokemon", Some(200));
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
