use super::gene::{Gene, INVALID_FITNESS};
use super::input_space::InputSpace;
use super::operators::{
    random_choice, selection_quota, weighted_scan_selection, MAX_EMPTY_SCANS, SCAN_PICK_PROBABILITY,
};
use crate::engines::evaluation::FitnessEvaluator;
use crate::error::{OptimizerError, Result};
use crate::types::GenerationSummary;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of top valid genes carried into the next generation
pub const ELITE_COUNT: usize = 2;

/// What `evolve` does when fewer than two genes are valid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliteFallback {
    /// Fill the missing elite slots with freshly seeded genes
    #[default]
    Reseed,
    /// Fail with `InsufficientValidGenes`
    Abort,
}

/// Rates and policies applied when breeding the next generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreedingParams {
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elite_fallback: EliteFallback,
}

/// One generation: a fixed-size set of genes.
#[derive(Debug)]
pub struct Population {
    id: usize,
    count: usize,
    genes: Vec<Gene>,
}

impl Population {
    pub fn new(genes: Vec<Gene>, count: usize, id: usize) -> Self {
        Self { id, count, genes }
    }

    /// `count` independently seeded genes
    pub fn seed_initial<R: Rng + ?Sized>(space: &InputSpace, count: usize, id: usize, rng: &mut R) -> Result<Self> {
        if count < ELITE_COUNT {
            return Err(OptimizerError::Configuration(format!(
                "Population size must be at least {}",
                ELITE_COUNT
            )));
        }
        if space.is_empty() {
            return Err(OptimizerError::Configuration("No inputs to optimise".to_string()));
        }

        let genes = (0..count)
            .map(|_| Gene::seeded(space, rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(genes, count, id))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Score every gene that has no fitness yet.
    ///
    /// Genes are scored in order unless the evaluator supports independent
    /// concurrent sessions, in which case they are spread over the rayon pool.
    pub fn evaluate_fitness<E: FitnessEvaluator + ?Sized>(&mut self, evaluator: &E, objective: &str) {
        let pending = self.genes.iter().filter(|g| !g.is_evaluated()).count();
        log::info!("Population {}: evaluating {} genes", self.id, pending);

        if evaluator.supports_concurrent_sessions() {
            self.genes
                .par_iter_mut()
                .filter(|g| !g.is_evaluated())
                .for_each(|g| {
                    g.evaluate_fitness(evaluator, objective);
                });
        } else {
            for gene in self.genes.iter_mut().filter(|g| !g.is_evaluated()) {
                gene.evaluate_fitness(evaluator, objective);
            }
        }
    }

    /// All genes, fittest first, unevaluated last. Stable.
    pub fn ranked_by_fitness(&self) -> Vec<&Gene> {
        let mut ranked: Vec<&Gene> = self.genes.iter().collect();
        ranked.sort_by(|a, b| compare_fitness_desc(a, b));
        ranked
    }

    /// Duplicates of the valid genes, fittest first
    pub fn valid_ranked(&self) -> Vec<Gene> {
        self.ranked_by_fitness()
            .into_iter()
            .filter(|g| g.is_valid())
            .map(Gene::duplicate)
            .collect()
    }

    /// Breed the next generation. `self` is left untouched.
    ///
    /// Two elites, rank-biased picks up to 40% of the target size, then
    /// children of an elite and any gene of this generation. Every gene of
    /// the new pool, elites included, is mutated afterwards.
    pub fn evolve<R: Rng + ?Sized>(
        &self,
        space: &InputSpace,
        params: &BreedingParams,
        next_id: usize,
        rng: &mut R,
    ) -> Result<Population> {
        let mut ranked = self.valid_ranked();

        if ranked.len() < ELITE_COUNT {
            match params.elite_fallback {
                EliteFallback::Abort => {
                    return Err(OptimizerError::InsufficientValidGenes { found: ranked.len() });
                }
                EliteFallback::Reseed => {
                    log::warn!(
                        "Population {}: only {} valid genes, seeding {} replacement elites",
                        self.id,
                        ranked.len(),
                        ELITE_COUNT - ranked.len()
                    );
                    while ranked.len() < ELITE_COUNT {
                        ranked.push(Gene::seeded(space, rng)?);
                    }
                }
            }
        }

        let elites = &ranked[..ELITE_COUNT];
        let mut pool: Vec<Gene> = elites.iter().map(Gene::duplicate).collect();

        let quota = selection_quota(self.count);
        let mut cursor = 0;
        while pool.len() < quota {
            match weighted_scan_selection(&ranked, SCAN_PICK_PROBABILITY, MAX_EMPTY_SCANS, &mut cursor, rng) {
                Some(idx) => pool.push(ranked[idx].duplicate()),
                None => break,
            }
        }

        while pool.len() < self.count {
            let (fit, other) = match (random_choice(elites, rng), random_choice(&self.genes, rng)) {
                (Some(fit), Some(other)) => (fit, other.duplicate()),
                _ => break,
            };
            pool.push(fit.breed(&other, params.crossover_rate, rng));
        }

        // the previous generation is empty only if someone built one by hand
        while pool.len() < self.count {
            pool.push(Gene::seeded(space, rng)?);
        }

        for gene in pool.iter_mut() {
            gene.mutate(space, params.mutation_rate, rng)?;
        }

        Ok(Population::new(pool, self.count, next_id))
    }

    /// Copy with duplicated genes
    pub fn dup(&self, id: usize) -> Population {
        Population::new(self.genes.iter().map(Gene::duplicate).collect(), self.count, id)
    }

    /// Best and mean fitness over every gene; unevaluated genes count as invalid
    pub fn summary(&self) -> GenerationSummary {
        let fitnesses: Vec<f64> = self
            .genes
            .iter()
            .map(|g| g.fitness().unwrap_or(INVALID_FITNESS))
            .collect();

        let best_fitness = self.ranked_by_fitness().first().and_then(|g| g.fitness());
        let mean_fitness = if fitnesses.is_empty() {
            0.0
        } else {
            fitnesses.iter().sum::<f64>() / fitnesses.len() as f64
        };

        GenerationSummary {
            generation: self.id,
            best_fitness,
            mean_fitness,
            valid_count: self.genes.iter().filter(|g| g.is_valid()).count(),
            size: self.genes.len(),
            completed_at: chrono::Utc::now(),
        }
    }

    /// Fittest valid gene, if any
    pub fn fittest(&self) -> Option<&Gene> {
        self.ranked_by_fitness().into_iter().find(|g| g.is_valid())
    }
}

fn compare_fitness_desc(a: &Gene, b: &Gene) -> Ordering {
    match (a.fitness(), b.fitness()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::EvaluationError;
    use crate::types::Properties;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Fitness is the value of `x`, shifted so most genes are valid
    struct ByX;

    impl FitnessEvaluator for ByX {
        fn evaluate(&self, p: &Properties, _o: &str) -> std::result::Result<f64, EvaluationError> {
            Ok(100.0 + p["x"])
        }
    }

    fn space() -> InputSpace {
        let mut space = InputSpace::new();
        space.register("x", 0.0, 50.0, 1.0).unwrap();
        space.register("y", 0.0, 50.0, 1.0).unwrap();
        space
    }

    fn with_x(space: &InputSpace, x: f64, y: f64) -> Gene {
        let props = [("x".to_string(), x), ("y".to_string(), y)].into_iter().collect();
        Gene::from_properties(props, space).unwrap()
    }

    fn params(crossover_rate: f64, mutation_rate: f64) -> BreedingParams {
        BreedingParams {
            crossover_rate,
            mutation_rate,
            elite_fallback: EliteFallback::Reseed,
        }
    }

    #[test]
    fn test_ranking_is_stable_with_unset_last() {
        let space = space();
        let mut genes = vec![
            with_x(&space, 5.0, 1.0),
            with_x(&space, 9.0, 2.0),
            with_x(&space, 5.0, 3.0),
        ];
        for g in genes.iter_mut() {
            g.evaluate_fitness(&ByX, "score");
        }
        genes.push(with_x(&space, 40.0, 4.0));
        let population = Population::new(genes, 4, 1);

        let ys: Vec<f64> = population
            .ranked_by_fitness()
            .iter()
            .map(|g| g.get("y").unwrap())
            .collect();
        assert_eq!(ys, vec![2.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_evolve_does_not_touch_receiver() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(4);
        let mut population = Population::seed_initial(&space, 10, 1, &mut rng).unwrap();
        population.evaluate_fitness(&ByX, "score");
        let before: Vec<Properties> = population.genes().iter().map(|g| g.properties().clone()).collect();

        let next = population.evolve(&space, &params(0.5, 0.5), 2, &mut rng).unwrap();

        let after: Vec<Properties> = population.genes().iter().map(|g| g.properties().clone()).collect();
        assert_eq!(before, after);
        assert!(population.genes().iter().all(|g| g.is_evaluated()));
        assert_eq!(next.id(), 2);
        assert!(next.genes().iter().all(|g| !g.is_evaluated()));
    }

    #[test]
    fn test_abort_fallback_reports_insufficient_genes() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(4);
        let population = Population::seed_initial(&space, 6, 1, &mut rng).unwrap();

        let strict = BreedingParams {
            elite_fallback: EliteFallback::Abort,
            ..params(0.5, 0.1)
        };
        assert!(matches!(
            population.evolve(&space, &strict, 2, &mut rng),
            Err(OptimizerError::InsufficientValidGenes { found: 0 })
        ));
    }

    #[test]
    fn test_seed_initial_rejects_tiny_populations() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(4);
        assert!(Population::seed_initial(&space, 1, 1, &mut rng).is_err());
        assert!(Population::seed_initial(&InputSpace::new(), 5, 1, &mut rng).is_err());
    }

    #[test]
    fn test_summary_counts_sentinels_in_mean() {
        let space = space();
        struct Split;
        impl FitnessEvaluator for Split {
            fn evaluate(&self, p: &Properties, _o: &str) -> std::result::Result<f64, EvaluationError> {
                if p["x"] > 10.0 {
                    Ok(301.0)
                } else {
                    Err(EvaluationError::Remote("bad input".to_string()))
                }
            }
        }

        let genes = vec![with_x(&space, 20.0, 0.0), with_x(&space, 1.0, 0.0)];
        let mut population = Population::new(genes, 2, 3);
        population.evaluate_fitness(&Split, "score");

        let summary = population.summary();
        assert_eq!(summary.generation, 3);
        assert_eq!(summary.best_fitness, Some(301.0));
        assert_eq!(summary.mean_fitness, 150.0);
        assert_eq!(summary.valid_count, 1);
        assert_eq!(summary.size, 2);
        assert_eq!(population.fittest().unwrap().get("x"), Some(20.0));
    }

    #[test]
    fn test_dup_copies_genes_without_fitness() {
        let space = space();
        let mut population = Population::new(vec![with_x(&space, 3.0, 3.0), with_x(&space, 4.0, 4.0)], 2, 1);
        population.evaluate_fitness(&ByX, "score");

        let copy = population.dup(9);
        assert_eq!(copy.id(), 9);
        assert_eq!(copy.count(), 2);
        assert_eq!(copy.genes()[1].properties(), population.genes()[1].properties());
        assert!(copy.genes().iter().all(|g| !g.is_evaluated()));
    }
}
