pub mod evaluator;
pub mod remote;

pub use evaluator::{EvaluationError, FitnessEvaluator, WithFixedInputs};
pub use remote::ScenarioClient;
