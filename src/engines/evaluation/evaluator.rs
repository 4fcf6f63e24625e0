use crate::types::Properties;
use thiserror::Error;

/// Failure reported by a fitness evaluator. Never aborts a generation: the
/// gene layer downgrades it to the invalid sentinel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing result for query {0}")]
    MissingResult(String),
}

/// Scores a property vector against an objective.
///
/// Implementations are shared across a whole run. The default assumes a
/// single remote session whose state every call mutates, so the population
/// evaluates genes one at a time. Only evaluators whose calls are fully
/// independent should report `supports_concurrent_sessions`.
pub trait FitnessEvaluator: Send + Sync {
    fn evaluate(&self, properties: &Properties, objective: &str) -> Result<f64, EvaluationError>;

    fn supports_concurrent_sessions(&self) -> bool {
        false
    }
}

impl<E: FitnessEvaluator + ?Sized> FitnessEvaluator for &E {
    fn evaluate(&self, properties: &Properties, objective: &str) -> Result<f64, EvaluationError> {
        (**self).evaluate(properties, objective)
    }

    fn supports_concurrent_sessions(&self) -> bool {
        (**self).supports_concurrent_sessions()
    }
}

/// Merges constant inputs into every evaluation call.
///
/// Fixed values win over tunable ones with the same key; configuration
/// validation rejects such overlaps before a run starts.
pub struct WithFixedInputs<E> {
    inner: E,
    fixed: Properties,
}

impl<E: FitnessEvaluator> WithFixedInputs<E> {
    pub fn new(inner: E, fixed: Properties) -> Self {
        Self { inner, fixed }
    }

    pub fn fixed(&self) -> &Properties {
        &self.fixed
    }
}

impl<E: FitnessEvaluator> FitnessEvaluator for WithFixedInputs<E> {
    fn evaluate(&self, properties: &Properties, objective: &str) -> Result<f64, EvaluationError> {
        if self.fixed.is_empty() {
            return self.inner.evaluate(properties, objective);
        }

        let mut merged = properties.clone();
        merged.extend(self.fixed.iter().map(|(k, v)| (k.clone(), *v)));
        self.inner.evaluate(&merged, objective)
    }

    fn supports_concurrent_sessions(&self) -> bool {
        self.inner.supports_concurrent_sessions()
    }
}
