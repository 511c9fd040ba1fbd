// Squad optimizer entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (stderr, so stdout carries only the report)
// 4. Load bootstrap data and the shortlist
// 5. Resolve budget and node limit from flags, shortlist, and config
// 6. Optimize and print the report

mod report;

use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use squadsmith_core::config::{self, xi_budget, Config};
use squadsmith_core::{optimize, OptimizeOptions};
use squadsmith_fpl::{load_bootstrap, load_shortlist, Shortlist};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "squadsmith")]
#[command(about = "Find the three best starting XIs for a fantasy football shortlist", long_about = None)]
struct Cli {
    /// Directory holding config/ and defaults/ [default: current directory]
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// League bootstrap JSON (overrides data.bootstrap)
    #[arg(long)]
    bootstrap: Option<PathBuf>,

    /// Shortlist in .json or .csv form (overrides data.shortlist)
    #[arg(long)]
    shortlist: Option<PathBuf>,

    /// Starting-XI budget in millions; ignores the bench value
    #[arg(long)]
    budget: Option<f64>,

    /// Money held back for the bench (overrides shortlist and config)
    #[arg(long)]
    bench: Option<f64>,

    /// Give up after this many search nodes; 0 means unlimited
    #[arg(long)]
    node_limit: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Optimize even when the shortlist is below the minimum size
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;

    init_tracing(&config.logging.filter)?;
    info!(
        "Config loaded: total budget {}, bench {}",
        config.squad.total_budget, config.squad.bench_value
    );

    let bootstrap_path = data_path(cli.bootstrap.as_deref(), &base_dir, &config.data.bootstrap);
    let bootstrap = load_bootstrap(&bootstrap_path).with_context(|| {
        format!("failed to load bootstrap data from {}", bootstrap_path.display())
    })?;
    info!(
        "Loaded {} players and {} teams",
        bootstrap.elements().len(),
        bootstrap.teams().len()
    );

    let shortlist_path = data_path(cli.shortlist.as_deref(), &base_dir, &config.data.shortlist);
    let shortlist = load_shortlist(&shortlist_path)
        .with_context(|| format!("failed to load shortlist from {}", shortlist_path.display()))?;

    let counts = shortlist.counts(&bootstrap);
    if !counts.is_complete() {
        let shortfalls = counts.shortfalls().join(", ");
        if !cli.force {
            bail!("shortlist too small: {shortfalls}; add players or pass --force");
        }
        warn!("shortlist below minimum size ({shortfalls}), optimizing anyway");
    }

    let budget = resolve_budget(&cli, &config, &shortlist)?;
    let options = OptimizeOptions {
        node_limit: resolve_node_limit(cli.node_limit, &config),
    };
    info!("Optimizing {} shortlisted players with budget {budget}", counts.total);

    let request = shortlist.to_request(&bootstrap, budget);
    let optimization = optimize(&request, &options).context("optimization failed")?;

    let output = match cli.format {
        Format::Text => report::render_text(&optimization, &bootstrap, budget),
        Format::Json => {
            report::render_json(&optimization, &bootstrap, budget, chrono::Utc::now())
                .context("failed to serialize report")?
        }
    };
    println!("{output}");

    Ok(())
}

/// Flag paths are taken as given; config paths are relative to `base_dir`.
fn data_path(flag: Option<&Path>, base_dir: &Path, configured: &str) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => base_dir.join(configured),
    }
}

/// `--budget` wins outright. Otherwise the bench value comes from `--bench`,
/// then the shortlist, then the config, and the XI gets what is left.
fn resolve_budget(cli: &Cli, config: &Config, shortlist: &Shortlist) -> anyhow::Result<f64> {
    if let Some(budget) = cli.budget {
        ensure!(
            budget.is_finite() && budget >= 0.0,
            "--budget must be a non-negative number, got {budget}"
        );
        return Ok(budget);
    }

    let bench = cli
        .bench
        .or(shortlist.bench_value)
        .unwrap_or(config.squad.bench_value);
    ensure!(
        bench.is_finite() && bench >= 0.0,
        "bench value must be a non-negative number, got {bench}"
    );
    Ok(xi_budget(config.squad.total_budget, bench))
}

fn resolve_node_limit(flag: Option<u64>, config: &Config) -> Option<u64> {
    match flag {
        Some(0) => None,
        Some(n) => Some(n),
        None => config.node_limit(),
    }
}

/// Initialize tracing to stderr. `RUST_LOG` takes precedence over the
/// configured filter.
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
