use super::source::{InputSource, InputSpecRecord};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// On-disk cache of input metadata, one JSON file per input.
///
/// Slider ranges practically never change between runs, so a file that
/// exists is trusted as-is. Remove the directory to force a refetch.
pub struct CachedInputSource<S> {
    inner: S,
    dir: PathBuf,
}

impl<S: InputSource> CachedInputSource<S> {
    pub fn new<P: AsRef<Path>>(inner: S, dir: P) -> Self {
        Self {
            inner,
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl<S: InputSource> InputSource for CachedInputSource<S> {
    fn fetch(&self, id: &str) -> Result<InputSpecRecord> {
        let path = self.path_for(id);

        if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let record: InputSpecRecord = serde_json::from_str(&data)?;
            log::debug!("Loaded input {} from cache", id);
            return Ok(record);
        }

        let record = self.inner.fetch(id)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        log::debug!("Cached input {} at {}", id, path.display());

        Ok(record)
    }
}
