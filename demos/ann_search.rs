use anyhow::{Context, Result};
use clap::Parser;
use mrpt::{brute_force_nearest, RpTreeConfig, RpTreeIndex};
use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;

// --- CLI Configuration ---
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Runs the seven-point example and prints the nearest neighbour of (-0.9, 0.4).
    Scenario {
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Builds an index over uniform random vectors and reports timing and recall.
    Bench {
        /// TOML file with max_depth / alpha / min_split / seed; flags override it.
        #[clap(long)]
        config: Option<PathBuf>,
        #[clap(long, default_value_t = 100_000)]
        points: usize,
        #[clap(long, default_value_t = 200)]
        dim: usize,
        #[clap(long, default_value_t = 100)]
        queries: usize,
        #[clap(long)]
        alpha: Option<f64>,
        #[clap(long)]
        min_split: Option<usize>,
        #[clap(long)]
        max_depth: Option<usize>,
        #[clap(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scenario { seed } => run_scenario(seed),
        Commands::Bench { config, points, dim, queries, alpha, min_split, max_depth, seed } => {
            let mut config = RpTreeConfig::load_or_default(config.as_deref())
                .context("loading index configuration")?;
            if let Some(alpha) = alpha {
                config.alpha = alpha;
            }
            if let Some(min_split) = min_split {
                config.min_split = min_split;
            }
            if let Some(max_depth) = max_depth {
                config.max_depth = max_depth;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            run_bench(config, points, dim, queries)
        }
    }
}

fn run_scenario(seed: Option<u64>) -> Result<()> {
    let points = array![
        [0.5, 0.5],
        [0.5, 0.6],
        [0.5, 0.4],
        [0.5, 0.45],
        [0.5, 0.48],
        [0.5, 0.6],
        [-1.0, 0.5],
    ];
    let mut builder = RpTreeConfig::builder().alpha(0.9).min_split(2);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut index = RpTreeIndex::new(builder.build()?)?;
    index.initialize(points.view())?;

    let query = array![-0.9, 0.4];
    let (nearest, distance) = index.find_nearest_with_distance(query.view())?;
    let (exact, _) = brute_force_nearest(points.view(), query.view())?;

    println!("Query point: {}", query);
    println!("Nearest point was: {} {} (distance {:.4})", nearest, points.row(nearest), distance);
    println!("Exact nearest point: {} {}", exact, points.row(exact));
    Ok(())
}

fn run_bench(config: RpTreeConfig, points: usize, dim: usize, queries: usize) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    println!("Building dataset ({points} x {dim})...");
    let data = Array2::from_shape_fn((points, dim), |_| rng.gen::<f64>());

    println!("Building tree...");
    let mut index = RpTreeIndex::new(config)?;
    let started = Instant::now();
    index.initialize(data.view())?;
    let build_time = started.elapsed();
    let stats = index.stats()?;
    println!(
        "Built in {:.2?}: {} nodes, {} leaves, depth {}, leaf sizes {}..={}",
        build_time,
        stats.node_count,
        stats.leaf_count,
        stats.max_depth_reached,
        stats.min_leaf_size,
        stats.max_leaf_size
    );

    let query_set = Array2::from_shape_fn((queries, dim), |_| rng.gen::<f64>());
    let mut hits = 0_usize;
    let mut tree_time = std::time::Duration::ZERO;
    for query in query_set.outer_iter() {
        let started = Instant::now();
        let nearest = index.find_nearest(query)?;
        tree_time += started.elapsed();

        let (exact, _) = brute_force_nearest(data.view(), query)?;
        if nearest == exact {
            hits += 1;
        }
    }

    if queries > 0 {
        println!("Mean query time: {:.2?}", tree_time / u32::try_from(queries)?);
        println!("Recall@1: {:.3}", hits as f64 / queries as f64);
    }
    Ok(())
}
