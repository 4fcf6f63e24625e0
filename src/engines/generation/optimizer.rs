use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    gene::Gene,
    input_space::InputSpace,
    population::{BreedingParams, EliteFallback, Population},
};
use crate::error::{OptimizerError, Result};
use crate::types::GenerationSummary;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct OptimizerConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub objective: String,
    pub elite_fallback: EliteFallback,
    pub seed: Option<u64>,
}

impl OptimizerConfig {
    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(OptimizerError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptimizerError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(OptimizerError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if self.objective.trim().is_empty() {
            return Err(OptimizerError::Configuration(
                "Objective must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

/// Drives the generational loop and keeps every population it produced.
pub struct Optimizer {
    config: OptimizerConfig,
    space: InputSpace,
    populations: Vec<Population>,
    next_id: usize,
    rng: StdRng,
}

impl Optimizer {
    pub fn new(space: InputSpace, config: OptimizerConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let first = Population::seed_initial(&space, config.population_size, 1, &mut rng)?;

        Ok(Self {
            config,
            space,
            populations: vec![first],
            next_id: 2,
            rng,
        })
    }

    /// Evaluate and evolve the latest population `iterations` times
    pub fn run<E, C>(
        &mut self,
        iterations: usize,
        evaluator: &E,
        callback: &mut C,
    ) -> Result<Vec<GenerationSummary>>
    where
        E: FitnessEvaluator + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        let params = BreedingParams {
            crossover_rate: self.config.crossover_rate,
            mutation_rate: self.config.mutation_rate,
            elite_fallback: self.config.elite_fallback,
        };
        let mut summaries = Vec::with_capacity(iterations);

        for _ in 0..iterations {
            let next_id = self.next_id;
            let population = self
                .populations
                .last_mut()
                .ok_or_else(|| OptimizerError::Configuration("Empty history".to_string()))?;

            callback.on_generation_start(population.id());
            population.evaluate_fitness(evaluator, &self.config.objective);

            let summary = population.summary();
            log::info!(
                "Population {}: fittest {:?}, mean {:.1}, {} of {} valid",
                summary.generation,
                summary.best_fitness,
                summary.mean_fitness,
                summary.valid_count,
                summary.size
            );
            callback.on_generation_complete(&summary);
            summaries.push(summary);

            let next = population.evolve(&self.space, &params, next_id, &mut self.rng)?;
            self.next_id += 1;
            self.populations.push(next);
        }

        Ok(summaries)
    }

    /// Every population so far, oldest first
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    pub fn latest(&self) -> Option<&Population> {
        self.populations.last()
    }

    pub fn input_space(&self) -> &InputSpace {
        &self.space
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Fittest valid gene across the whole history
    pub fn best_gene(&self) -> Option<&Gene> {
        self.populations
            .iter()
            .filter_map(Population::fittest)
            .fold(None, |best: Option<&Gene>, gene| match best {
                Some(b) if b.fitness() >= gene.fitness() => Some(b),
                _ => Some(gene),
            })
    }
}
