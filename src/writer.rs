use crate::{
    config::Config,
    error::{Error, Result},
    file::MatchedFile,
    format,
    job::Job,
};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// What happened to one file while writing a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content was written between header and footer
    Added,

    /// Content couldn't be read; an error line was written instead
    Failed {
        /// Message recorded in the bundle
        message: String,
    },
}

/// Per-file entry of a written bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path relative to the project root
    pub relative_path: String,

    /// Whether the content made it into the bundle
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Returns true if the file couldn't be read.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }
}

/// Writes one bundle per job into the output directory.
pub(crate) struct BundleWriter {
    output_dir: PathBuf,
}

impl BundleWriter {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_path(),
        }
    }

    /// Output directory the bundles go to.
    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the path a job's bundle is written to.
    pub(crate) fn bundle_path(&self, job: &Job) -> PathBuf {
        self.output_dir.join(&job.output_file)
    }

    /// Creates the output directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub(crate) fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))
    }

    /// Creates or truncates the job's bundle and writes every file into it.
    ///
    /// A file that can't be read gets its header, an error line and its
    /// footer; the remaining files are still written.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle itself cannot be created or written.
    pub(crate) fn write_bundle(
        &self,
        job: &Job,
        files: &[MatchedFile],
    ) -> Result<Vec<FileReport>> {
        let path = self.bundle_path(job);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        let mut out = BufWriter::new(file);

        info!("  Creating '{}'...", job.output_file);

        let footer = format::footer(&job.comments);
        let mut reports = Vec::with_capacity(files.len());

        for matched in files {
            info!("    + Adding {}", matched.relative_path);

            let header = format::header(&job.comments, &matched.relative_path);
            let outcome = match matched.read_lossy() {
                Ok(content) => {
                    write_all(
                        &mut out,
                        &path,
                        &[header.as_str(), content.as_str(), footer.as_str()],
                    )?;
                    FileOutcome::Added
                }
                Err(e) => {
                    let message =
                        format!("Could not read file {}: {}", matched.relative_path, e);
                    warn!("    ! ERROR: {}", message);

                    let error_line = format::error_line(&job.comments, &message);
                    write_all(
                        &mut out,
                        &path,
                        &[header.as_str(), error_line.as_str(), footer.as_str()],
                    )?;
                    FileOutcome::Failed { message }
                }
            };

            reports.push(FileReport {
                relative_path: matched.relative_path.clone(),
                outcome,
            });
        }

        out.flush().map_err(|e| Error::io(&path, e))?;
        Ok(reports)
    }
}

fn write_all(out: &mut impl Write, path: &Path, parts: &[&str]) -> Result<()> {
    for part in parts {
        out.write_all(part.as_bytes())
            .map_err(|e| Error::io(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::CommentStyle;
    use assert_fs::prelude::*;

    fn create_test_config(root: &Path) -> Config {
        Config::builder()
            .root_dir(root)
            .output_dir("bundles")
            .build()
            .unwrap()
    }

    fn js_job() -> Job {
        Job::new(
            "Scripts",
            ["src/*.js"],
            "_scripts.js",
            CommentStyle::line("//"),
        )
    }

    #[test]
    fn test_prepare_creates_output_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = BundleWriter::new(&create_test_config(temp.path()));

        writer.prepare().unwrap();
        writer.prepare().unwrap();

        assert!(temp.child("bundles").is_dir());
        assert_eq!(writer.output_dir(), temp.path().join("bundles"));
    }

    #[test]
    fn test_write_bundle_content() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.js").write_str("console.log('main');\n").unwrap();

        let writer = BundleWriter::new(&create_test_config(temp.path()));
        writer.prepare().unwrap();

        let files = vec![MatchedFile::new(temp.path().join("src/main.js"), temp.path())];
        let reports = writer.write_bundle(&js_job(), &files).unwrap();

        let dashes = "-".repeat(80);
        let expected = format!(
            "// {d}\n// START OF FILE: {p}\n// {d}\n\nconsole.log('main');\n\n// {d}\n\n\n",
            d = dashes,
            p = files[0].relative_path
        );

        let bundle = fs::read_to_string(writer.bundle_path(&js_job())).unwrap();
        assert_eq!(bundle, expected);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, FileOutcome::Added);
    }

    #[test]
    fn test_unreadable_file_is_recorded_inline() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/a.js").write_str("a").unwrap();
        temp.child("src/c.js").write_str("c").unwrap();

        let writer = BundleWriter::new(&create_test_config(temp.path()));
        writer.prepare().unwrap();

        let files = vec![
            MatchedFile::new(temp.path().join("src/a.js"), temp.path()),
            MatchedFile::new(temp.path().join("src/b.js"), temp.path()),
            MatchedFile::new(temp.path().join("src/c.js"), temp.path()),
        ];
        let reports = writer.write_bundle(&js_job(), &files).unwrap();

        assert!(!reports[0].is_failed());
        assert!(reports[1].is_failed());
        assert!(!reports[2].is_failed());

        let bundle = fs::read_to_string(writer.bundle_path(&js_job())).unwrap();
        assert_eq!(bundle.matches("START OF FILE:").count(), 3);
        assert!(bundle.contains(&format!(
            "// ERROR: Could not read file {}: ",
            files[1].relative_path
        )));
        assert!(bundle.ends_with(&format!("c\n// {}\n\n\n", "-".repeat(80))));
    }

    #[test]
    fn test_existing_bundle_is_truncated() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/main.js").write_str("new").unwrap();
        temp.child("bundles/_scripts.js")
            .write_str("stale content that is much longer than the new bundle body")
            .unwrap();

        let writer = BundleWriter::new(&create_test_config(temp.path()));
        let files = vec![MatchedFile::new(temp.path().join("src/main.js"), temp.path())];
        writer.write_bundle(&js_job(), &files).unwrap();

        let bundle = fs::read_to_string(writer.bundle_path(&js_job())).unwrap();
        assert!(!bundle.contains("stale"));
        assert!(bundle.contains("\n\nnew\n"));
    }

    #[test]
    fn test_missing_output_directory_is_fatal() {
        let temp = assert_fs::TempDir::new().unwrap();
        let writer = BundleWriter::new(&create_test_config(temp.path()));

        let result = writer.write_bundle(&js_job(), &[]);
        assert!(result.unwrap_err().is_io());
    }
}
