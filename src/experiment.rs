use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::ExperimentError;
use crate::tree::RedBlackTree;

/// How the keys of a trial tree are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyDistribution {
    /// Every key in `0..n` exactly once, in shuffled order.
    #[default]
    Permutation,
    /// `n` keys drawn from `0..n` with replacement.
    Uniform,
}

impl KeyDistribution {
    /// Draws the insertion sequence for a tree of `size` keys.
    pub fn keys<R: Rng + ?Sized>(self, size: usize, rng: &mut R) -> Vec<usize> {
        match self {
            Self::Permutation => {
                let mut keys: Vec<usize> = (0..size).collect();
                keys.shuffle(rng);
                keys
            }
            Self::Uniform => (0..size).map(|_| rng.gen_range(0..size)).collect(),
        }
    }
}

/// Settings for [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    /// Number of keys inserted per tree; one report column each.
    pub sizes: Vec<usize>,
    /// Trees built per size.
    pub trials: usize,
    pub seed: u64,
    pub distribution: KeyDistribution,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sizes: vec![10, 100, 1_000, 10_000],
            trials: 10,
            seed: 0,
            distribution: KeyDistribution::Permutation,
        }
    }
}

impl ExperimentConfig {
    /// A default config whose `count` sizes are drawn uniformly from `min..=max` using `seed`.
    pub fn with_random_sizes(count: usize, min: usize, max: usize, seed: u64) -> Result<Self, ExperimentError> {
        if min > max {
            return Err(ExperimentError::InvalidSizeRange { min, max });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let sizes = (0..count).map(|_| rng.gen_range(min..=max)).collect();
        Ok(Self { sizes, seed, ..Self::default() })
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.sizes.is_empty() {
            return Err(ExperimentError::NoSizes);
        }
        if self.trials == 0 {
            return Err(ExperimentError::NoTrials);
        }
        Ok(())
    }
}

/// The trial results for one input size.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeResult {
    pub size: usize,
    /// Red percentage of each trial tree, in trial order.
    pub percentages: Vec<f64>,
    pub mean: f64,
}

/// Everything [`run`] measured.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentReport {
    /// One entry per configured size, in configuration order.
    pub rows: Vec<SizeResult>,
    /// Mean red percentage over every trial of every size, E(n).
    pub expected: f64,
}

impl ExperimentReport {
    /// Mean red percentage per distinct size.
    pub fn means(&self) -> BTreeMap<usize, f64> {
        means_by_size(&self.rows)
    }

    /// Renders the report as CSV.
    ///
    /// The header lists every size followed by `E(n)`. Each following line is one trial index
    /// with that trial's percentage for every size; the first of them also carries E(n).
    pub fn to_csv(&self) -> String {
        let mut header: Vec<String> = self.rows.iter().map(|row| row.size.to_string()).collect();
        header.push("E(n)".to_owned());
        let mut lines = vec![header.join(",")];

        let trials = self.rows.iter().map(|row| row.percentages.len()).max().unwrap_or(0);
        for trial in 0..trials {
            let mut cells: Vec<String> = self
                .rows
                .iter()
                .map(|row| row.percentages.get(trial).map(f64::to_string).unwrap_or_default())
                .collect();
            cells.push(if trial == 0 { self.expected.to_string() } else { String::new() });
            lines.push(cells.join(","));
        }

        let mut csv = lines.join("\n");
        csv.push('\n');
        csv
    }
}

/// Builds one tree from keys drawn with `distribution` and returns its red percentage.
pub fn trial_percent_red<R: Rng + ?Sized>(size: usize, distribution: KeyDistribution, rng: &mut R) -> f64 {
    let tree: RedBlackTree<usize> = distribution.keys(size, rng).into_iter().collect();
    tree.percent_red()
}

/// Red percentage of `trials` independent trees of `size` keys, in trial order.
///
/// Trials run in parallel; each one seeds its own generator from `seed`, `size` and its index,
/// so the result only depends on the arguments.
pub fn trial_percentages(size: usize, trials: usize, seed: u64, distribution: KeyDistribution) -> Vec<f64> {
    (0..trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(trial_seed(seed, size, trial));
            let percent = trial_percent_red(size, distribution, &mut rng);
            trace!(size, trial, percent, "trial done");
            percent
        })
        .collect()
}

/// Mean red percentage over `trials` trees of `size` keys, or 0 with no trials.
pub fn mean_percent_red(size: usize, trials: usize, seed: u64, distribution: KeyDistribution) -> f64 {
    mean(&trial_percentages(size, trials, seed, distribution))
}

/// Mean red percentage per input size, over `trials` shuffled permutations of `0..size` each.
/// # Example
/// ```
/// # use red_black_bst::experiment::mean_percent_red_by_size;
/// #
/// let means = mean_percent_red_by_size(&[1, 2, 3], 5, 7);
/// // one key is a black root; two keys always leave one red link
/// assert_eq!(means[&1], 0.0);
/// assert_eq!(means[&2], 50.0);
/// assert!(means[&3] <= 100.0 / 3.0);
/// ```
pub fn mean_percent_red_by_size(sizes: &[usize], trials: usize, seed: u64) -> BTreeMap<usize, f64> {
    sizes
        .iter()
        .map(|&size| (size, mean_percent_red(size, trials, seed, KeyDistribution::Permutation)))
        .collect()
}

/// Runs every trial described by `config`.
pub fn run(config: &ExperimentConfig) -> Result<ExperimentReport, ExperimentError> {
    config.validate()?;

    let rows: Vec<SizeResult> = config
        .sizes
        .iter()
        .map(|&size| {
            let percentages = trial_percentages(size, config.trials, config.seed, config.distribution);
            let mean = mean(&percentages);
            debug!(size, trials = config.trials, mean, "size done");
            SizeResult { size, percentages, mean }
        })
        .collect();

    let all: Vec<f64> = rows.iter().flat_map(|row| row.percentages.iter().copied()).collect();
    let expected = mean(&all);
    info!(sizes = rows.len(), trials = config.trials, expected, "experiment finished");

    Ok(ExperimentReport { rows, expected })
}

fn means_by_size(rows: &[SizeResult]) -> BTreeMap<usize, f64> {
    let mut sums: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for row in rows {
        sums.entry(row.size).or_default().extend_from_slice(&row.percentages);
    }
    sums.into_iter().map(|(size, percentages)| (size, mean(&percentages))).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// splitmix64 finalizer over the three inputs
fn trial_seed(seed: u64, size: usize, trial: usize) -> u64 {
    let mut z = seed
        ^ (size as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (trial as u64).wrapping_add(1).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
