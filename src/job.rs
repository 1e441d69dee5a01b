//! Job definitions.
//!
//! A job names a group of files (configs, docs, scripts, styles) by glob
//! patterns and says which bundle they go to and how its delimiters look.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const DEFAULT_COMMENT_START: &str = "#";

/// Comment delimiters wrapped around header, footer and error lines.
///
/// An empty `end` means line-comment style (`// ...`); a non-empty one means
/// block-comment style (`/* ... */`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStyle {
    /// Opening delimiter, used verbatim (may be empty)
    #[serde(default = "default_comment_start")]
    pub start: String,

    /// Closing delimiter, empty for line comments
    #[serde(default)]
    pub end: String,
}

fn default_comment_start() -> String {
    DEFAULT_COMMENT_START.to_string()
}

impl Default for CommentStyle {
    fn default() -> Self {
        Self::line(DEFAULT_COMMENT_START)
    }
}

impl CommentStyle {
    /// Line-comment style with no closing delimiter.
    #[must_use]
    pub fn line(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: String::new(),
        }
    }

    /// Block-comment style with both delimiters.
    #[must_use]
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// No delimiters at all; lines start with a single space.
    #[must_use]
    pub fn plain() -> Self {
        Self::line("")
    }

    /// Returns true if this style has a closing delimiter.
    #[must_use]
    pub fn is_block(&self) -> bool {
        !self.end.is_empty()
    }
}

/// One unit of work: patterns to search, the bundle to write, its comment style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Human-readable job name
    pub name: String,

    /// Glob patterns relative to the project root, in declaration order
    pub search_patterns: Vec<String>,

    /// Bundle file name inside the output directory
    pub output_file: String,

    /// Delimiters for this bundle
    #[serde(default)]
    pub comments: CommentStyle,
}

impl Job {
    /// Creates a new job.
    #[must_use]
    pub fn new<I, S>(
        name: impl Into<String>,
        search_patterns: I,
        output_file: impl Into<String>,
        comments: CommentStyle,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            search_patterns: search_patterns.into_iter().map(Into::into).collect(),
            output_file: output_file.into(),
            comments,
        }
    }
}

static DEFAULT_JOBS: Lazy<Vec<Job>> = Lazy::new(|| {
    vec![
        Job::new(
            "Project Configuration",
            ["package.json", ".gitignore", ".gitattributes", ".npmrc"],
            "_project_configs.txt",
            CommentStyle::line("#"),
        ),
        Job::new(
            "Documentation",
            ["*.md"],
            "_project_documentation.md",
            CommentStyle::plain(),
        ),
        Job::new(
            "Electron Main Process",
            ["src/main.js", "src/preload.js"],
            "_electron_main_process.js",
            CommentStyle::line("//"),
        ),
        Job::new(
            "Electron Renderer Scripts",
            ["src/renderer/renderer.js"],
            "_electron_renderer_scripts.js",
            CommentStyle::line("//"),
        ),
        Job::new(
            "HTML Views",
            ["src/renderer/**/*.html"],
            "_electron_views.html",
            CommentStyle::plain(),
        ),
        Job::new(
            "Stylesheets",
            ["src/renderer/**/*.css"],
            "_electron_styles.css",
            CommentStyle::block("/*", "*/"),
        ),
    ]
});

/// Returns the built-in job table for an Electron project.
#[must_use]
pub fn default_jobs() -> Vec<Job> {
    DEFAULT_JOBS.clone()
}
