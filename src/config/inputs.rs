use super::traits::ConfigSection;
use crate::error::OptimizerError;
use crate::types::Properties;
use serde::{Deserialize, Serialize};

/// Which sliders are tuned, which stay constant, and the query to maximise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub fitness: String,
    pub tunable: Vec<String>,
    pub fixed: Properties,
}

impl ConfigSection for InputsConfig {
    fn section_name() -> &'static str {
        "inputs"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if self.fitness.trim().is_empty() {
            return Err(OptimizerError::Configuration(
                "A fitness query is required".to_string()
            ));
        }
        if self.tunable.is_empty() {
            return Err(OptimizerError::Configuration(
                "At least one tunable input is required".to_string()
            ));
        }
        if let Some(id) = self.tunable.iter().find(|id| self.fixed.contains_key(*id)) {
            return Err(OptimizerError::Configuration(format!(
                "Input {} is both tunable and fixed",
                id
            )));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(id) = self.tunable.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(OptimizerError::Configuration(format!(
                "Input {} is listed twice",
                id
            )));
        }
        Ok(())
    }
}
