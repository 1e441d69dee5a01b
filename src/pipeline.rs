use crate::{
    config::Config,
    error::Result,
    job::Job,
    scanner::Scanner,
    writer::{BundleWriter, FileReport},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Result of running a single job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The bundle was written
    Written {
        /// One entry per matched file, in bundle order
        files: Vec<FileReport>,
    },

    /// No eligible files matched; no bundle was created
    Skipped,

    /// Dry run: files that would have been bundled
    Planned {
        /// Relative paths in bundle order
        files: Vec<String>,
    },
}

/// Per-job summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// Job name
    pub name: String,

    /// Bundle path (written only for [`JobOutcome::Written`])
    pub output_file: PathBuf,

    /// What the job did
    pub outcome: JobOutcome,
}

impl JobReport {
    /// Number of files matched by the job.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match &self.outcome {
            JobOutcome::Written { files } => files.len(),
            JobOutcome::Planned { files } => files.len(),
            JobOutcome::Skipped => 0,
        }
    }

    /// Number of files whose content couldn't be read.
    #[must_use]
    pub fn error_count(&self) -> usize {
        match &self.outcome {
            JobOutcome::Written { files } => files.iter().filter(|f| f.is_failed()).count(),
            JobOutcome::Skipped | JobOutcome::Planned { .. } => 0,
        }
    }

    /// Returns true if the job matched nothing.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.outcome, JobOutcome::Skipped)
    }

    fn status(&self) -> &'static str {
        match self.outcome {
            JobOutcome::Written { .. } if self.error_count() > 0 => "partial",
            JobOutcome::Written { .. } => "written",
            JobOutcome::Skipped => "skipped",
            JobOutcome::Planned { .. } => "planned",
        }
    }
}

/// Statistics collected during a run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Per-job reports in execution order
    pub jobs: Vec<JobReport>,

    /// Output directory path
    pub output_directory: PathBuf,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Total execution time
    pub duration: Duration,
}

impl RunStats {
    /// Number of bundles written to disk.
    #[must_use]
    pub fn bundles_written(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| matches!(job.outcome, JobOutcome::Written { .. }))
            .count()
    }

    /// Number of jobs skipped for lack of matches.
    #[must_use]
    pub fn jobs_skipped(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_skipped()).count()
    }

    /// Total number of files across all jobs.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.jobs.iter().map(JobReport::file_count).sum()
    }

    /// Total number of files that couldn't be read.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.jobs.iter().map(JobReport::error_count).sum()
    }

    /// Prints a human-readable per-job summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════════════╗");
        println!("║                   Consolidation Summary                       ║");
        println!("╠═══════════════════════════════════════════════════════════════╣");
        for job in &self.jobs {
            println!(
                "║ {:<30} {:>8} {:>6} files {:>3} err  ║",
                truncate(&job.name, 30),
                job.status(),
                job.file_count(),
                job.error_count()
            );
        }
        println!("║                                                               ║");
        println!(
            "║ Bundles Written:      {:>8}                                ║",
            self.bundles_written()
        );
        println!(
            "║ Jobs Skipped:         {:>8}                                ║",
            self.jobs_skipped()
        );
        println!(
            "║ Read Errors:          {:>8}                                ║",
            self.total_errors()
        );
        println!("║ Output Directory:                                             ║");
        println!("║   {}", self.output_directory.display());
        println!(
            "║ Total Time:           {:>8.2}s                               ║",
            self.duration.as_secs_f64()
        );
        if self.dry_run {
            println!("║ ⚠ No files were written (dry run mode)                        ║");
        }
        println!("╚═══════════════════════════════════════════════════════════════╝\n");
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Runs every configured job in order.
pub struct Pipeline {
    config: Config,
    scanner: Scanner,
    writer: BundleWriter,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let scanner = Scanner::new(&config);
        let writer = BundleWriter::new(&config);

        Ok(Self {
            config,
            scanner,
            writer,
        })
    }

    /// Executes every job and returns the per-job summary.
    ///
    /// Jobs that match nothing are skipped and files that can't be read are
    /// recorded inline; neither stops the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory or a bundle cannot be created
    /// or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use consolidate::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder().root_dir(".").build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(root_dir = %self.config.root_dir.display()))]
    pub fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
        } else {
            self.writer.prepare()?;
        }

        info!(
            "Starting file consolidation. Output will be in '{}/'",
            self.config.output_dir.display()
        );
        debug!("Project root: {}", self.scanner.root_dir().display());
        debug!(
            "Excluding files {:?} and directories {:?}",
            self.config.exclusions.files().collect::<Vec<_>>(),
            self.config.exclusions.dirs().collect::<Vec<_>>()
        );

        let mut jobs = Vec::with_capacity(self.config.jobs.len());
        for job in &self.config.jobs {
            jobs.push(self.run_job(job)?);
        }

        info!("All consolidation jobs finished!");

        Ok(RunStats {
            jobs,
            output_directory: self.writer.output_dir().to_path_buf(),
            dry_run: self.config.dry_run,
            duration: start_time.elapsed(),
        })
    }

    fn run_job(&self, job: &Job) -> Result<JobReport> {
        info!("--- Running Job: {} ---", job.name);

        let files = self.scanner.resolve(job)?;

        let outcome = if files.is_empty() {
            info!(
                "No files found for patterns: {:?}. Skipping.",
                job.search_patterns
            );
            JobOutcome::Skipped
        } else if self.config.dry_run {
            for file in &files {
                info!("    + Would add {}", file.relative_path);
            }
            JobOutcome::Planned {
                files: files.into_iter().map(|f| f.relative_path).collect(),
            }
        } else {
            JobOutcome::Written {
                files: self.writer.write_bundle(job, &files)?,
            }
        };

        if !matches!(outcome, JobOutcome::Skipped) {
            info!("--- Job '{}' complete. ---", job.name);
        }

        Ok(JobReport {
            name: job.name.clone(),
            output_file: self.writer.bundle_path(job),
            outcome,
        })
    }
}
