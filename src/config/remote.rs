use super::traits::ConfigSection;
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub area_code: String,
    pub start_year: u32,
    pub end_year: u32,
    pub timeout_secs: u64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://et-engine.com".to_string(),
            area_code: "nl".to_string(),
            start_year: 2011,
            end_year: 2030,
            timeout_secs: 60,
            cache_dir: Some(PathBuf::from("cache")),
        }
    }
}

impl ConfigSection for RemoteConfig {
    fn section_name() -> &'static str {
        "remote"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if self.base_url.trim().is_empty() {
            return Err(OptimizerError::Configuration(
                "Remote base URL must not be empty".to_string()
            ));
        }
        if self.end_year <= self.start_year {
            return Err(OptimizerError::Configuration(
                "End year must be after start year".to_string()
            ));
        }
        if self.timeout_secs == 0 {
            return Err(OptimizerError::Configuration(
                "Timeout must be positive".to_string()
            ));
        }
        Ok(())
    }
}
