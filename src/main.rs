use anyhow::Context;
use etoptimizer::config::ConfigManager;
use etoptimizer::data::CachedInputSource;
use etoptimizer::engines::evaluation::{ScenarioClient, WithFixedInputs};
use etoptimizer::engines::generation::{ConsoleProgressCallback, InputSpace, Optimizer};
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("CONFIG").ok())
        .unwrap_or_else(|| "etoptimizer.toml".to_string());

    let mut manager = ConfigManager::new();
    manager
        .load_from_file(&config_path)
        .with_context(|| format!("loading {}", config_path))?;
    let config = manager.get().clone();

    let client = ScenarioClient::create(&config.remote).context("creating remote scenario")?;

    let space = match &config.remote.cache_dir {
        Some(dir) => InputSpace::load(&config.inputs.tunable, &CachedInputSource::new(&client, dir)),
        None => InputSpace::load(&config.inputs.tunable, &client),
    }
    .context("loading input ranges")?;

    let mut optimizer = Optimizer::new(space, config.optimizer_config())?;
    let evaluator = WithFixedInputs::new(&client, config.inputs.fixed.clone());

    optimizer.run(config.evolution.iterations, &evaluator, &mut ConsoleProgressCallback)?;

    match optimizer.best_gene() {
        Some(best) => {
            println!("Best fitness {:.0}", best.fitness().unwrap_or_default());
            for (id, value) in best.properties() {
                println!("  {} = {}", id, value);
            }
        }
        None => println!("No valid gene found in {} generations", config.evolution.iterations),
    }

    Ok(())
}
