use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Range metadata for one slider, as served by the remote engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpecRecord {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Anything that can look up the `{min, max, step}` triple for an input
pub trait InputSource {
    fn fetch(&self, id: &str) -> Result<InputSpecRecord>;
}

impl<S: InputSource + ?Sized> InputSource for &S {
    fn fetch(&self, id: &str) -> Result<InputSpecRecord> {
        (**self).fetch(id)
    }
}
