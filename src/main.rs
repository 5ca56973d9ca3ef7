//! Red-node percentage of left-leaning red-black trees, for one input file or over random trials

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use red_black_bst::experiment::{self, ExperimentConfig, KeyDistribution};
use red_black_bst::load;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "red_black_bst")]
#[command(about = "Measure the share of red nodes in left-leaning red-black trees")]
#[command(version)]
struct Args {
    /// File whose first line holds the keys to insert; runs the random experiment when omitted
    input: Option<PathBuf>,

    /// Comma-separated input sizes for the experiment
    #[arg(long, value_delimiter = ',', env = "RBT_SIZES")]
    sizes: Vec<usize>,

    /// Draw this many input sizes at random from --min-size..=--max-size; overrides --sizes
    #[arg(long, env = "RBT_RANDOM_SIZES")]
    random_sizes: Option<usize>,

    /// Smallest random input size
    #[arg(long, default_value = "0", env = "RBT_MIN_SIZE")]
    min_size: usize,

    /// Largest random input size
    #[arg(long, default_value = "10", env = "RBT_MAX_SIZE")]
    max_size: usize,

    /// Trees built per input size
    #[arg(short, long, default_value = "10", env = "RBT_TRIALS")]
    trials: usize,

    /// Seed for key shuffling and size drawing
    #[arg(short, long, default_value = "0", env = "RBT_SEED")]
    seed: u64,

    /// Draw keys with replacement instead of shuffling 0..n
    #[arg(short, long, env = "RBT_UNIFORM")]
    uniform: bool,

    /// Enable debug logging
    #[arg(short, long, env = "RBT_DEBUG")]
    debug: bool,
}

impl Args {
    fn experiment_config(&self) -> anyhow::Result<ExperimentConfig> {
        let mut config = match self.random_sizes {
            Some(count) => ExperimentConfig::with_random_sizes(count, self.min_size, self.max_size, self.seed)?,
            None => ExperimentConfig { seed: self.seed, ..ExperimentConfig::default() },
        };
        if self.random_sizes.is_none() && !self.sizes.is_empty() {
            config.sizes = self.sizes.clone();
        }
        config.trials = self.trials;
        if self.uniform {
            config.distribution = KeyDistribution::Uniform;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging; stdout is reserved for results
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("red_black_bst={}", log_level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(ref input) = args.input {
        let tree = load::load_file(input).with_context(|| format!("failed to load {}", input.display()))?;
        tracing::debug!(keys = tree.size(), height = tree.height(), "tree built");
        println!("Percent of Red Nodes: {:.6}", tree.percent_red());
        return Ok(());
    }

    let config = args.experiment_config()?;
    tracing::info!(
        "Running {} trials for {} input sizes (seed {}, {:?} keys)",
        config.trials,
        config.sizes.len(),
        config.seed,
        config.distribution
    );

    let report = experiment::run(&config).context("experiment failed")?;
    print!("{}", report.to_csv());

    Ok(())
}
