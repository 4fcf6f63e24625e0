use super::evaluator::{EvaluationError, FitnessEvaluator};
use crate::config::RemoteConfig;
use crate::data::source::{InputSource, InputSpecRecord};
use crate::error::{OptimizerError, Result};
use crate::types::Properties;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Deserialize)]
struct ScenarioResponse {
    id: Value,
}

/// Session with the remote energy model.
///
/// Every evaluation resets and rewrites the same scenario, so calls must not
/// overlap; the client keeps the default of sequential evaluation.
pub struct ScenarioClient {
    client: Client,
    base_url: String,
    scenario_id: String,
}

impl ScenarioClient {
    /// Open a fresh scenario on the remote engine
    pub fn create(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EvaluationError::Transport(e.to_string()))?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let form = [
            ("title", "API".to_string()),
            ("area_code", config.area_code.clone()),
            ("start_year", config.start_year.to_string()),
            ("end_year", config.end_year.to_string()),
        ];
        let response: ScenarioResponse = client
            .post(format!("{}/api/v3/scenarios/", base_url))
            .form(&form)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EvaluationError::Transport(e.to_string()))?
            .json()
            .map_err(|e| EvaluationError::Parse(e.to_string()))?;

        let scenario_id = match response.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        log::info!("Created scenario {} on {}", scenario_id, base_url);

        Ok(Self {
            client,
            base_url,
            scenario_id,
        })
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }
}

impl FitnessEvaluator for ScenarioClient {
    fn evaluate(&self, properties: &Properties, objective: &str) -> std::result::Result<f64, EvaluationError> {
        let response: Value = self
            .client
            .put(format!("{}/api/v3/scenarios/{}", self.base_url, self.scenario_id))
            .form(&scenario_form(properties, objective))
            .send()
            .map_err(|e| EvaluationError::Transport(e.to_string()))?
            .json()
            .map_err(|e| EvaluationError::Parse(e.to_string()))?;

        query_result(&response, objective)
    }
}

impl InputSource for ScenarioClient {
    fn fetch(&self, id: &str) -> Result<InputSpecRecord> {
        self.client
            .get(format!("{}/api/v3/inputs/{}", self.base_url, id))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| OptimizerError::InputSource(format!("{}: {}", id, e)))?
            .json()
            .map_err(|e| OptimizerError::InputSource(format!("{}: {}", id, e)))
    }
}

/// Form fields for one evaluation: the query, a reset of the scenario, and
/// every slider value.
pub fn scenario_form(properties: &Properties, objective: &str) -> Vec<(String, String)> {
    let mut form = vec![
        ("gqueries[]".to_string(), objective.to_string()),
        ("autobalance".to_string(), "true".to_string()),
        ("reset".to_string(), "true".to_string()),
    ];
    form.extend(
        properties
            .iter()
            .map(|(key, value)| (format!("scenario[user_values][{}]", key), value.to_string())),
    );
    form
}

/// Extract the future value of `query` from an update response
pub fn query_result(response: &Value, query: &str) -> std::result::Result<f64, EvaluationError> {
    if let Some(errors) = response.get("errors") {
        return Err(EvaluationError::Remote(errors.to_string()));
    }

    let future = response
        .get("gqueries")
        .and_then(|q| q.get(query))
        .and_then(|q| q.get("future"))
        .ok_or_else(|| EvaluationError::MissingResult(query.to_string()))?;

    future
        .as_f64()
        .ok_or_else(|| EvaluationError::Parse(format!("{} future is not a number: {}", query, future)))
}
