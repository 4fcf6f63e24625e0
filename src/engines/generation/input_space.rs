use crate::data::source::InputSource;
use crate::error::{OptimizerError, Result};
use rand::Rng;
use std::collections::BTreeMap;

/// A slider of the remote model: its range and quantization step.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    id: String,
    min: f64,
    max: f64,
    step: f64,
    step_count: u64,
}

impl InputSpec {
    pub fn new(id: impl Into<String>, min: f64, max: f64, step: f64) -> Result<Self> {
        let id = id.into();
        let finite = min.is_finite() && max.is_finite() && step.is_finite();
        if !finite || max <= min || step <= 0.0 {
            return Err(OptimizerError::InvalidRange { id, min, max, step });
        }

        let step_count = ((max - min) / step).floor() as u64;
        Ok(Self { id, min, max, step, step_count })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Random grid value. The scaled offset is rounded to one decimal before
    /// `min` is added, so steps finer than 0.1 may land off-grid.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.step_count == 0 {
            return self.min;
        }
        let n = rng.gen_range(0..self.step_count);
        self.min + round_to_tenth(self.step * n as f64)
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Registry of every tunable input of a run
#[derive(Debug, Clone, Default)]
pub struct InputSpace {
    specs: BTreeMap<String, InputSpec>,
}

impl InputSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the range of every id from `source` and register it
    pub fn load<S: InputSource + ?Sized>(ids: &[String], source: &S) -> Result<Self> {
        let mut space = Self::new();
        for id in ids {
            let record = source.fetch(id)?;
            space.register(id.clone(), record.min, record.max, record.step)?;
        }
        log::info!("Loaded {} inputs", space.len());
        Ok(space)
    }

    pub fn register(&mut self, id: impl Into<String>, min: f64, max: f64, step: f64) -> Result<()> {
        let spec = InputSpec::new(id, min, max, step)?;
        self.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&InputSpec> {
        self.specs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.specs.contains_key(id)
    }

    pub fn sample<R: Rng + ?Sized>(&self, id: &str, rng: &mut R) -> Result<f64> {
        self.specs
            .get(id)
            .map(|spec| spec.sample(rng))
            .ok_or_else(|| OptimizerError::UnknownInput(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
