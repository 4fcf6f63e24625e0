pub mod cache;
pub mod source;

pub use cache::CachedInputSource;
pub use source::{InputSource, InputSpecRecord};
