pub mod input_space;
pub mod gene;
pub mod operators;
pub mod population;
pub mod optimizer;
pub mod progress;

pub use input_space::{InputSpace, InputSpec};
pub use gene::{Gene, INVALID_FITNESS, VALIDITY_THRESHOLD};
pub use population::{BreedingParams, EliteFallback, Population, ELITE_COUNT};
pub use optimizer::{Optimizer, OptimizerConfig, ProgressCallback};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
