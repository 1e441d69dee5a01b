use anyhow::Context;
use clap::Parser;
use consolidate::{default_jobs, load_jobs, Config, Pipeline, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "consolidate",
    version,
    author,
    about = "Bundle project files into per-job text files",
    long_about = "Bundle project files into per-job text files for code review or LLM context.\n\n\
    Each job collects files matching its glob patterns and writes them, sorted by path, \
    into one output file with a comment-style header and footer around every file. \
    Patterns containing ** match at any depth; all others match only at the project root.\n\n\
    USAGE EXAMPLES:\n  \
      # Bundle the current directory with the built-in Electron jobs\n  \
      consolidate\n\n  \
      # Bundle another project into ./bundles\n  \
      consolidate --dir ./my-app --out bundles\n\n  \
      # Use a custom job table\n  \
      consolidate --jobs ./jobs.json\n\n  \
      # Show what would be bundled\n  \
      consolidate --dry-run"
)]
struct Cli {
    /// Project root; patterns are resolved against it
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    dir: PathBuf,

    /// Output directory, relative to the project root unless absolute
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, value_name = "PATH")]
    out: PathBuf,

    /// JSON file with the job table (replaces the built-in jobs)
    #[arg(short, long, env = "CONSOLIDATE_JOBS", value_name = "FILE")]
    jobs: Option<PathBuf>,

    /// Additional file name to exclude (can be used multiple times)
    #[arg(long = "exclude-file", value_name = "NAME")]
    exclude_files: Vec<String>,

    /// Additional directory name to exclude anywhere in a path (can be used multiple times)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    exclude_dirs: Vec<String>,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Print the effective job table as JSON and exit
    #[arg(long)]
    print_jobs: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let jobs = match &cli.jobs {
        Some(path) => load_jobs(path)
            .with_context(|| format!("Failed to load jobs from {}", path.display()))?,
        None => default_jobs(),
    };

    if cli.print_jobs {
        let json = serde_json::to_string_pretty(&jobs).context("Failed to serialize jobs")?;
        println!("{json}");
        return Ok(());
    }

    let config = Config::builder()
        .root_dir(cli.dir)
        .output_dir(cli.out)
        .jobs(jobs)
        .exclude_files(cli.exclude_files)
        .exclude_dirs(cli.exclude_dirs)
        .dry_run(cli.dry_run)
        .build()
        .context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Consolidation failed")?;

    stats.print_summary();

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("consolidate=info"),
        1 => EnvFilter::new("consolidate=debug"),
        _ => EnvFilter::new("consolidate=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
