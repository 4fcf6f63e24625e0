use super::{
    evolution::EvolutionConfig,
    inputs::InputsConfig,
    remote::RemoteConfig,
    traits::ConfigSection,
};
use crate::engines::generation::OptimizerConfig;
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `ETOPT__EVOLUTION__POPULATION_SIZE=20`
pub const ENV_PREFIX: &str = "ETOPT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub inputs: InputsConfig,
    pub remote: RemoteConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        self.evolution.validate()?;
        self.inputs.validate()?;
        self.remote.validate()?;
        Ok(())
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            population_size: self.evolution.population_size,
            mutation_rate: self.evolution.mutation_rate,
            crossover_rate: self.evolution.crossover_rate,
            objective: self.inputs.fitness.clone(),
            elite_fallback: self.evolution.elite_fallback,
            seed: self.evolution.seed,
        }
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Load a TOML file, apply environment overrides, validate
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), OptimizerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OptimizerError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::new(&path.to_string_lossy(), config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        self.config = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), OptimizerError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| OptimizerError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| OptimizerError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn update<F>(&mut self, f: F) -> Result<(), OptimizerError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut updated = self.config.clone();
        f(&mut updated);
        updated.validate()?;
        self.config = updated;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
