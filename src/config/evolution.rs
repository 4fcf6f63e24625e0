use super::traits::ConfigSection;
use crate::engines::generation::EliteFallback;
use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub iterations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_fallback: EliteFallback,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            iterations: 20,
            mutation_rate: 0.1,
            crossover_rate: 0.5,
            elite_fallback: EliteFallback::Reseed,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if self.population_size < 2 {
            return Err(OptimizerError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.iterations == 0 {
            return Err(OptimizerError::Configuration(
                "Iterations must be at least 1".to_string()
            ));
        }
        if self.mutation_rate < 0.0 || self.mutation_rate > 1.0 {
            return Err(OptimizerError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.crossover_rate < 0.0 || self.crossover_rate > 1.0 {
            return Err(OptimizerError::Configuration(
                "Crossover rate must be between 0 and 1".to_string()
            ));
        }
        Ok(())
    }
}
