use crate::{
    config::Config,
    error::{Error, Result},
    file::MatchedFile,
    filter::ExclusionRules,
    job::Job,
};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

const RECURSIVE_MARKER: &str = "**";

/// A job's search patterns compiled into one matcher.
///
/// Patterns containing `**` match at any depth below the root; all others are
/// anchored at the root and `*` never crosses a `/`.
#[derive(Debug, Clone)]
pub(crate) struct PatternSet {
    globs: GlobSet,
    max_depth: Option<usize>,
}

impl PatternSet {
    /// Compiles patterns, failing on the first invalid one.
    pub(crate) fn compile(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut max_depth = Some(0);

        for pattern in patterns {
            let trimmed = pattern.trim_start_matches("./");
            let anchored = if is_recursive(trimmed) {
                max_depth = None;
                if trimmed.starts_with("**/") {
                    trimmed.to_string()
                } else {
                    format!("**/{trimmed}")
                }
            } else {
                max_depth = max_depth.map(|depth: usize| depth.max(pattern_depth(trimmed)));
                trimmed.to_string()
            };

            let glob = GlobBuilder::new(&anchored)
                .literal_separator(true)
                .build()
                .map_err(|e| Error::invalid_pattern(pattern, e.kind().to_string()))?;

            trace!("Compiled pattern '{}' as '{}'", pattern, anchored);
            builder.add(glob);
        }

        let globs = builder
            .build()
            .map_err(|e| Error::invalid_pattern(patterns.join(", "), e.to_string()))?;

        Ok(Self { globs, max_depth })
    }

    /// Returns true if a root-relative path matches any pattern.
    pub(crate) fn is_match(&self, relative_path: &Path) -> bool {
        self.globs.is_match(relative_path)
    }

    /// Deepest level a plain-only pattern set can reach, `None` if recursive.
    pub(crate) const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

fn is_recursive(pattern: &str) -> bool {
    pattern.contains(RECURSIVE_MARKER)
}

fn pattern_depth(pattern: &str) -> usize {
    pattern
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .count()
}

/// Resolves job patterns against the project root.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    exclusions: ExclusionRules,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        let root_dir =
            std::path::absolute(&config.root_dir).unwrap_or_else(|_| config.root_dir.clone());

        Self {
            root_dir,
            exclusions: config.exclusions.clone(),
        }
    }

    /// Absolute project root used for matching and relative paths.
    pub(crate) fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Returns the job's eligible files, deduplicated and sorted by path.
    ///
    /// Directory walk errors are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a search pattern is not a valid glob.
    pub(crate) fn resolve(&self, job: &Job) -> Result<Vec<MatchedFile>> {
        let patterns = PatternSet::compile(&job.search_patterns)?;

        let mut walker = WalkDir::new(&self.root_dir).follow_links(false);
        if let Some(depth) = patterns.max_depth() {
            walker = walker.max_depth(depth);
        }

        debug!(
            "Resolving {} pattern(s) for '{}' (max depth: {:?})",
            job.search_patterns.len(),
            job.name,
            patterns.max_depth()
        );

        let exclusions = &self.exclusions;
        let entries = walker.into_iter().filter_entry(|entry| {
            entry.depth() == 0 || !exclusions.is_excluded_component(entry.file_name())
        });

        let mut matched = BTreeSet::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&self.root_dir) else {
                continue;
            };

            if !patterns.is_match(relative) {
                continue;
            }

            if !path.is_file() {
                trace!("Skipping non-file match: {}", relative.display());
                continue;
            }

            if self.exclusions.is_excluded(relative) {
                trace!("Skipping excluded file: {}", relative.display());
                continue;
            }

            matched.insert(path.to_path_buf());
        }

        debug!("Job '{}' matched {} file(s)", job.name, matched.len());

        Ok(matched
            .into_iter()
            .map(|path| MatchedFile::new(path, &self.root_dir))
            .collect())
    }
}
