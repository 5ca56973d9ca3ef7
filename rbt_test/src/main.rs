use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use red_black_bst::experiment::KeyDistribution;
use red_black_bst::RedBlackTree;

/// Builds large random trees in parallel, checks every invariant on each and reports the share of
/// red nodes.
#[derive(Parser, Debug)]
#[command(name = "rbt_test")]
#[command(version)]
struct Args {
    /// Keys inserted per tree, drawn with replacement from 0..keys
    #[arg(short, long, default_value = "1000000")]
    keys: usize,

    /// Number of trees
    #[arg(short, long, default_value = "4")]
    trials: usize,

    #[arg(short, long, default_value = "0")]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!("Building {} trees of {} random keys", args.trials, args.keys);

    let percentages = (0..args.trials)
        .into_par_iter()
        .map(|trial| -> anyhow::Result<f64> {
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(trial as u64));
            let tree: RedBlackTree<usize> = KeyDistribution::Uniform.keys(args.keys, &mut rng).into_iter().collect();
            tree.check().with_context(|| format!("trial {trial} broke the tree"))?;
            tracing::info!(trial, size = tree.size(), height = tree.height(), flips = tree.color_flips(), "tree checked");
            Ok(tree.percent_red())
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    for (trial, percent) in percentages.iter().enumerate() {
        println!("trial {trial}: {percent:.4}% red");
    }
    if !percentages.is_empty() {
        let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
        println!("mean: {mean:.4}% red");
    }

    Ok(())
}
