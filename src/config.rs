use crate::error::{Error, Result};
use crate::filter::ExclusionRules;
use crate::job::{default_jobs, Job};
use crate::scanner::PatternSet;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory name used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "mergedFiles";

/// Configuration for a consolidation run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Project root; patterns and relative paths are resolved against it
    pub root_dir: PathBuf,

    /// Output directory, relative to the root unless absolute
    pub output_dir: PathBuf,

    /// Jobs in execution order
    pub jobs: Vec<Job>,

    /// Effective exclusion rules, always including the output directory name
    pub exclusions: ExclusionRules,

    /// Dry run mode (no file writes)
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use consolidate::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir("./my-electron-app")
    ///     .output_dir("bundles")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns the output directory resolved against the project root.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root_dir.join(&self.output_dir)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Root directory doesn't exist or isn't a directory
    /// - The output directory has no usable name
    /// - No jobs are configured, or a job is malformed
    /// - Two jobs write the same output file
    /// - A search pattern isn't a valid glob
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::config(format!(
                "Root directory does not exist: {}",
                self.root_dir.display()
            )));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::config(format!(
                "Root path is not a directory: {}",
                self.root_dir.display()
            )));
        }

        if output_dir_name(&self.output_dir).is_none() {
            return Err(Error::config(format!(
                "Output directory must end in a directory name: {}",
                self.output_dir.display()
            )));
        }

        if self.jobs.is_empty() {
            return Err(Error::config("At least one job must be configured"));
        }

        let mut outputs = HashSet::new();
        for job in &self.jobs {
            validate_job(job)?;

            if !outputs.insert(job.output_file.as_str()) {
                return Err(Error::config(format!(
                    "Output file '{}' is used by more than one job",
                    job.output_file
                )));
            }
        }

        Ok(())
    }
}

fn validate_job(job: &Job) -> Result<()> {
    if job.name.trim().is_empty() {
        return Err(Error::config("Job name must not be empty"));
    }

    if job.search_patterns.is_empty() {
        return Err(Error::config(format!(
            "Job '{}' has no search patterns",
            job.name
        )));
    }

    let output = Path::new(&job.output_file);
    if job.output_file.is_empty() || output.file_name() != Some(output.as_os_str()) {
        return Err(Error::config(format!(
            "Job '{}' output file must be a plain file name, got '{}'",
            job.name, job.output_file
        )));
    }

    PatternSet::compile(&job.search_patterns)?;
    Ok(())
}

fn output_dir_name(output_dir: &Path) -> Option<String> {
    output_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Loads a job table from a JSON file.
///
/// The file holds an array of job objects; `comments` may be omitted.
///
/// # Errors
///
/// Returns an error if the file can't be read or isn't a valid job array.
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<Job>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let jobs = serde_json::from_str(&content)?;
    Ok(jobs)
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    jobs: Option<Vec<Job>>,
    exclusions: Option<ExclusionRules>,
    extra_exclude_files: Vec<String>,
    extra_exclude_dirs: Vec<String>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the project root.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Replaces the built-in job table.
    #[must_use]
    pub fn jobs(mut self, jobs: Vec<Job>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Replaces the default exclusion rules.
    ///
    /// The output directory is still excluded.
    #[must_use]
    pub fn exclusions(mut self, rules: ExclusionRules) -> Self {
        self.exclusions = Some(rules);
        self
    }

    /// Adds file names to exclude on top of the current rules.
    #[must_use]
    pub fn exclude_files(mut self, names: Vec<String>) -> Self {
        self.extra_exclude_files.extend(names);
        self
    }

    /// Adds path components to exclude on top of the current rules.
    #[must_use]
    pub fn exclude_dirs(mut self, names: Vec<String>) -> Self {
        self.extra_exclude_dirs.extend(names);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let output_dir = self
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let exclusions = self
            .exclusions
            .unwrap_or_default()
            .exclude_files(self.extra_exclude_files)
            .exclude_dirs(self.extra_exclude_dirs)
            .exclude_dirs(output_dir_name(&output_dir));

        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir,
            jobs: self.jobs.unwrap_or_else(default_jobs),
            exclusions,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::CommentStyle;
    use assert_fs::prelude::*;

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder().root_dir(temp.path()).build().unwrap();

        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.jobs, default_jobs());
        assert_eq!(config.output_path(), temp.path().join("mergedFiles"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_output_dir_is_always_excluded() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .root_dir(temp.path())
            .output_dir("build/bundles")
            .exclusions(ExclusionRules::empty())
            .build()
            .unwrap();

        assert!(config.exclusions.is_excluded(Path::new("build/bundles/a.txt")));
        assert!(!config.exclusions.is_excluded(Path::new("node_modules/a.js")));
    }

    #[test]
    fn test_extra_exclusions_extend_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .root_dir(temp.path())
            .exclude_files(vec!["package-lock.json".to_string()])
            .exclude_dirs(vec!["dist".to_string()])
            .build()
            .unwrap();

        assert!(config.exclusions.is_excluded(Path::new("package-lock.json")));
        assert!(config.exclusions.is_excluded(Path::new("dist/app.js")));
        assert!(config.exclusions.is_excluded(Path::new("node_modules/a.js")));
    }

    #[test]
    fn test_invalid_root_dir() {
        let result = Config::builder()
            .root_dir("/nonexistent/path/that/should/not/exist")
            .build();

        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_output_dir_without_name() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Config::builder().root_dir(temp.path()).output_dir("..").build();

        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_output_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        let jobs = vec![
            Job::new("A", ["*.md"], "out.txt", CommentStyle::default()),
            Job::new("B", ["*.json"], "out.txt", CommentStyle::default()),
        ];

        let result = Config::builder().root_dir(temp.path()).jobs(jobs).build();
        assert!(result.unwrap_err().to_string().contains("out.txt"));
    }

    #[test]
    fn test_output_file_must_be_plain_name() {
        let temp = assert_fs::TempDir::new().unwrap();
        let jobs = vec![Job::new("A", ["*.md"], "nested/out.txt", CommentStyle::default())];

        let result = Config::builder().root_dir(temp.path()).jobs(jobs).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_job_without_patterns() {
        let temp = assert_fs::TempDir::new().unwrap();
        let jobs = vec![Job::new("Empty", Vec::<String>::new(), "out.txt", CommentStyle::default())];

        let result = Config::builder().root_dir(temp.path()).jobs(jobs).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();
        let jobs = vec![Job::new("Broken", ["src/[abc"], "out.txt", CommentStyle::default())];

        let result = Config::builder().root_dir(temp.path()).jobs(jobs).build();
        assert!(matches!(result, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_load_jobs() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("jobs.json");
        file.write_str(
            r#"[
                {"name": "Rust", "search_patterns": ["src/**/*.rs"], "output_file": "rust.rs",
                 "comments": {"start": "//", "end": ""}},
                {"name": "Manifest", "search_patterns": ["Cargo.toml"], "output_file": "manifest.txt"}
            ]"#,
        )
        .unwrap();

        let jobs = load_jobs(file.path()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].comments, CommentStyle::line("//"));
        assert_eq!(jobs[1].comments, CommentStyle::line("#"));
    }

    #[test]
    fn test_load_jobs_rejects_bad_json() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("jobs.json");
        file.write_str("{ not json").unwrap();

        let err = load_jobs(file.path()).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn test_load_jobs_missing_file() {
        let err = load_jobs("/nonexistent/jobs.json").unwrap_err();
        assert!(err.is_io());
    }
}
