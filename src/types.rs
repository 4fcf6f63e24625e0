use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input identifier -> slider value. Ordered so iteration (and therefore
/// random draws) is reproducible under a fixed seed.
pub type Properties = BTreeMap<String, f64>;

/// Per-generation statistics handed to progress callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: Option<f64>,
    pub mean_fitness: f64,
    pub valid_count: usize,
    pub size: usize,
    pub completed_at: DateTime<Utc>,
}
