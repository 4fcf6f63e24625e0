pub mod traits;
pub mod evolution;
pub mod inputs;
pub mod remote;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use inputs::InputsConfig;
pub use remote::RemoteConfig;
