//! # consolidate
//!
//! Bundles the files of a project into a handful of text files, one per job,
//! ready to paste into a code review tool or an LLM context window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use consolidate::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./my-electron-app")
//!     .output_dir("mergedFiles")
//!     .build()?;
//!
//! let stats = Pipeline::new(config)?.run()?;
//! println!("{} bundles written", stats.bundles_written());
//! # Ok(())
//! # }
//! ```
//!
//! ## How a job runs
//!
//! 1. **Scanner**: resolves the job's glob patterns against the root. Patterns
//!    containing `**` match at any depth, all others only at the root.
//! 2. **Filter**: drops excluded file names and anything below an excluded
//!    directory (the output directory is always one of them).
//! 3. **Writer**: writes every match, sorted by path, into the job's bundle
//!    between a header and a footer in the job's comment style.
//!
//! A job that matches nothing is skipped. A file that can't be read is
//! recorded as an error line inside the bundle and the run continues.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod filter;
mod format;
mod job;
mod pipeline;
mod scanner;
mod writer;

pub use config::{load_jobs, Config, ConfigBuilder, DEFAULT_OUTPUT_DIR};
pub use error::{Error, Result};
pub use file::MatchedFile;
pub use filter::{ExclusionRules, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_FILES};
pub use job::{default_jobs, CommentStyle, Job};
pub use pipeline::{JobOutcome, JobReport, Pipeline, RunStats};
pub use writer::{FileOutcome, FileReport};

/// Runs every configured job with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Output directory cannot be created
/// - A bundle cannot be created or written
///
/// # Examples
///
/// ```no_run
/// use consolidate::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .root_dir(".")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}
