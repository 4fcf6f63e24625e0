//! Gene representation for slider optimisation
//!
//! A gene holds one value for every tunable input of an [`InputSpace`] and
//! represents a single candidate solution (every slider position at once).
//! Its fitness is requested from the evaluator at most once per property
//! vector: anything that changes the properties (mutation, crossover)
//! drops the cached value so it is scored again.
//!
//! Fitness values at or below [`VALIDITY_THRESHOLD`] are not realistic
//! outcomes of the remote model, and failed evaluations are stored as
//! [`INVALID_FITNESS`]. Both make a gene invalid for selection.

use super::input_space::InputSpace;
use crate::engines::evaluation::FitnessEvaluator;
use crate::error::{OptimizerError, Result};
use crate::types::Properties;
use rand::Rng;

pub const VALIDITY_THRESHOLD: f64 = 100.0;
pub const INVALID_FITNESS: f64 = -1.0;

#[derive(Debug, PartialEq)]
pub struct Gene {
    properties: Properties,
    fitness: Option<f64>,
}

impl Gene {
    /// Gene with every input of `space` set to its minimum. Call [`Gene::seed`]
    /// before using it.
    pub fn blank(space: &InputSpace) -> Self {
        let properties = space
            .ids()
            .map(|id| (id.to_string(), space.get(id).map_or(0.0, |spec| spec.min())))
            .collect();
        Self { properties, fitness: None }
    }

    pub fn seeded<R: Rng + ?Sized>(space: &InputSpace, rng: &mut R) -> Result<Self> {
        let mut gene = Self::blank(space);
        gene.seed(space, rng)?;
        Ok(gene)
    }

    /// Build a gene from explicit values; the key set must match `space` exactly.
    pub fn from_properties(properties: Properties, space: &InputSpace) -> Result<Self> {
        if let Some(unknown) = properties.keys().find(|id| !space.contains(id)) {
            return Err(OptimizerError::UnknownInput(unknown.clone()));
        }
        if let Some(missing) = space.ids().find(|id| !properties.contains_key(*id)) {
            return Err(OptimizerError::MissingInput(missing.to_string()));
        }
        Ok(Self { properties, fitness: None })
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.properties.get(id).copied()
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.fitness, Some(f) if f > VALIDITY_THRESHOLD)
    }

    /// Randomize every allele
    pub fn seed<R: Rng + ?Sized>(&mut self, space: &InputSpace, rng: &mut R) -> Result<()> {
        for (id, value) in self.properties.iter_mut() {
            *value = space.sample(id, rng)?;
        }
        self.fitness = None;
        Ok(())
    }

    /// Score this gene, or return the cached score.
    ///
    /// Evaluator failures are logged and stored as [`INVALID_FITNESS`] so a
    /// single bad run never aborts a generation.
    pub fn evaluate_fitness<E: FitnessEvaluator + ?Sized>(&mut self, evaluator: &E, objective: &str) -> f64 {
        if let Some(fitness) = self.fitness {
            return fitness;
        }

        let fitness = match evaluator.evaluate(&self.properties, objective) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                log::warn!("Non-finite fitness {} for {}", value, self.describe());
                INVALID_FITNESS
            }
            Err(e) => {
                log::warn!("Evaluation failed for {}: {}", self.describe(), e);
                INVALID_FITNESS
            }
        };

        log::debug!("Fitness {:.0}: {}", fitness, self.describe());
        self.fitness = Some(fitness);
        fitness
    }

    /// Child starting as a copy of `self`, taking each allele from `other`
    /// with probability `crossover_rate`.
    pub fn breed<R: Rng + ?Sized>(&self, other: &Gene, crossover_rate: f64, rng: &mut R) -> Gene {
        let mut child = self.duplicate();
        for (id, value) in child.properties.iter_mut() {
            if rng.gen::<f64>() < crossover_rate {
                if let Some(theirs) = other.get(id) {
                    *value = theirs;
                }
            }
        }
        child
    }

    /// Resample each allele with probability `mutation_rate`. Always drops
    /// the cached fitness.
    pub fn mutate<R: Rng + ?Sized>(&mut self, space: &InputSpace, mutation_rate: f64, rng: &mut R) -> Result<()> {
        for (id, value) in self.properties.iter_mut() {
            if rng.gen::<f64>() < mutation_rate {
                *value = space.sample(id, rng)?;
            }
        }
        self.fitness = None;
        Ok(())
    }

    /// Deep copy of the properties without the fitness
    pub fn duplicate(&self) -> Gene {
        Gene {
            properties: self.properties.clone(),
            fitness: None,
        }
    }

    pub fn describe(&self) -> String {
        self.properties
            .values()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::EvaluationError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl FitnessEvaluator for Counting {
        fn evaluate(&self, _properties: &Properties, _objective: &str) -> std::result::Result<f64, EvaluationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(500.0 + n as f64)
        }
    }

    struct Failing;

    impl FitnessEvaluator for Failing {
        fn evaluate(&self, _properties: &Properties, _objective: &str) -> std::result::Result<f64, EvaluationError> {
            Err(EvaluationError::Transport("connection refused".to_string()))
        }
    }

    fn space() -> InputSpace {
        let mut space = InputSpace::new();
        space.register("a", 0.0, 100.0, 1.0).unwrap();
        space.register("b", 0.0, 100.0, 1.0).unwrap();
        space.register("c", 0.0, 100.0, 1.0).unwrap();
        space
    }

    fn gene(space: &InputSpace, a: f64, b: f64, c: f64) -> Gene {
        let props = [("a", a), ("b", b), ("c", c)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Gene::from_properties(props, space).unwrap()
    }

    #[test]
    fn test_fitness_is_computed_once() {
        let space = space();
        let evaluator = Counting { calls: AtomicUsize::new(0) };
        let mut g = gene(&space, 1.0, 2.0, 3.0);

        assert_eq!(g.evaluate_fitness(&evaluator, "score"), 500.0);
        assert_eq!(g.evaluate_fitness(&evaluator, "score"), 500.0);
        assert_eq!(evaluator.calls.load(Ordering::SeqCst), 1);
        assert!(g.is_valid());
    }

    #[test]
    fn test_failure_becomes_sentinel() {
        let space = space();
        let mut g = gene(&space, 1.0, 2.0, 3.0);

        assert_eq!(g.evaluate_fitness(&Failing, "score"), INVALID_FITNESS);
        assert_eq!(g.fitness(), Some(INVALID_FITNESS));
        assert!(!g.is_valid());
    }

    #[test]
    fn test_validity_threshold_is_exclusive() {
        struct Fixed(f64);
        impl FitnessEvaluator for Fixed {
            fn evaluate(&self, _p: &Properties, _o: &str) -> std::result::Result<f64, EvaluationError> {
                Ok(self.0)
            }
        }

        let space = space();
        let mut at = gene(&space, 0.0, 0.0, 0.0);
        at.evaluate_fitness(&Fixed(VALIDITY_THRESHOLD), "score");
        assert!(!at.is_valid());

        let mut above = gene(&space, 0.0, 0.0, 0.0);
        above.evaluate_fitness(&Fixed(100.5), "score");
        assert!(above.is_valid());

        let mut nan = gene(&space, 0.0, 0.0, 0.0);
        assert_eq!(nan.evaluate_fitness(&Fixed(f64::NAN), "score"), INVALID_FITNESS);

        assert!(!gene(&space, 0.0, 0.0, 0.0).is_valid());
    }

    #[test]
    fn test_crossover_boundaries() {
        let space = space();
        let first = gene(&space, 1.0, 2.0, 3.0);
        let second = gene(&space, 7.0, 8.0, 9.0);
        let mut rng = StdRng::seed_from_u64(11);

        let child = first.breed(&second, 0.0, &mut rng);
        assert_eq!(child.properties(), first.properties());

        let child = first.breed(&second, 1.0, &mut rng);
        assert_eq!(child.properties(), second.properties());
        assert_eq!(child.fitness(), None);
    }

    #[test]
    fn test_crossover_only_mixes_parent_alleles() {
        let space = space();
        let first = gene(&space, 1.0, 2.0, 3.0);
        let second = gene(&space, 7.0, 8.0, 9.0);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..50 {
            let child = first.breed(&second, 0.5, &mut rng);
            for (id, value) in child.properties() {
                assert!(*value == first.get(id).unwrap() || *value == second.get(id).unwrap());
            }
        }
    }

    #[test]
    fn test_mutation_boundaries() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(99);
        let evaluator = Counting { calls: AtomicUsize::new(0) };

        let mut g = gene(&space, 0.5, 0.5, 0.5);
        g.evaluate_fitness(&evaluator, "score");
        g.mutate(&space, 0.0, &mut rng).unwrap();
        assert_eq!(g.properties(), gene(&space, 0.5, 0.5, 0.5).properties());
        assert_eq!(g.fitness(), None);

        // 0.5 is off the integer grid, so every resampled allele differs
        g.mutate(&space, 1.0, &mut rng).unwrap();
        assert!(g.properties().values().all(|v| *v != 0.5));
    }

    #[test]
    fn test_duplicate_drops_fitness() {
        let space = space();
        let evaluator = Counting { calls: AtomicUsize::new(0) };
        let mut g = gene(&space, 1.0, 2.0, 3.0);
        g.evaluate_fitness(&evaluator, "score");

        let copy = g.duplicate();
        assert_eq!(copy.properties(), g.properties());
        assert_eq!(copy.fitness(), None);
    }

    #[test]
    fn test_from_properties_validates_keys() {
        let space = space();
        let mut props = gene(&space, 1.0, 2.0, 3.0).properties().clone();
        props.insert("d".to_string(), 1.0);
        assert!(matches!(
            Gene::from_properties(props, &space),
            Err(OptimizerError::UnknownInput(id)) if id == "d"
        ));

        let mut props = gene(&space, 1.0, 2.0, 3.0).properties().clone();
        props.remove("b");
        assert!(matches!(
            Gene::from_properties(props, &space),
            Err(OptimizerError::MissingInput(id)) if id == "b"
        ));
    }

    #[test]
    fn test_seeded_gene_covers_every_input() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(1);
        let g = Gene::seeded(&space, &mut rng).unwrap();

        assert_eq!(g.properties().len(), 3);
        assert!(g.properties().values().all(|v| (0.0..100.0).contains(v)));
    }
}
