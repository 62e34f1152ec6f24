// src/tasks/generate.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::errors::{LitdagError, Result};
use crate::extract::{ExtractOptions, extract_code_blocks, render_blocks};
use crate::fs::{FileSystem, glob_files};
use crate::rename::output_file_name;
use crate::types::ErrorPolicy;

/// Inputs for one generate pass, all relative to the project root.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub tutorials: String,
    pub examples_dir: PathBuf,
    pub extension: String,
    pub extract: ExtractOptions,
}

/// Result of processing a single tutorial.
#[derive(Debug)]
pub enum FileOutcome {
    /// Code was extracted and written here.
    Written(PathBuf),
    /// The document has no extractable code; nothing was written.
    NoCode,
    /// Reading or extraction failed.
    Failed(LitdagError),
}

#[derive(Debug)]
pub struct FileResult {
    pub source: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file results of a generate pass, in processing order.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub files: Vec<FileResult>,
}

impl GenerateReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Written(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &LitdagError)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            FileOutcome::Failed(err) => Some((f.source.as_path(), err)),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Apply an aggregate error policy.
    ///
    /// `Continue` logs every failure and keeps the report; `Abort` turns the
    /// first failure into the task's error.
    pub fn apply_policy(mut self, policy: ErrorPolicy) -> Result<Self> {
        match policy {
            ErrorPolicy::Continue => {
                for (source, err) in self.failures() {
                    error!(source = ?source, error = %err, "skipping tutorial");
                }
                Ok(self)
            }
            ErrorPolicy::Abort => {
                let first = self
                    .files
                    .iter()
                    .position(|f| matches!(f.outcome, FileOutcome::Failed(_)));
                match first.map(|idx| self.files.swap_remove(idx).outcome) {
                    Some(FileOutcome::Failed(err)) => Err(err),
                    _ => Ok(self),
                }
            }
        }
    }
}

/// Extract every tutorial matched by `opts.tutorials` into
/// `opts.examples_dir`.
///
/// Per-file read and extraction problems are recorded in the report and do
/// not stop the pass; the caller decides what they mean via
/// [`GenerateReport::apply_policy`]. Failing to list tutorials or to write
/// an output file is returned as an error.
pub fn generate_examples(
    fs: &dyn FileSystem,
    root: &Path,
    opts: &GenerateOptions,
) -> Result<GenerateReport> {
    let sources = glob_files(fs, root, &opts.tutorials)?;
    let out_dir = root.join(&opts.examples_dir);

    let mut report = GenerateReport::default();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for source in sources {
        if !fs.is_file(&source) {
            continue;
        }
        let outcome = generate_one(fs, &source, &out_dir, opts, &mut claimed)?;
        report.files.push(FileResult { source, outcome });
    }

    info!(
        tutorials = report.files.len(),
        written = report.written().count(),
        failed = report.failures().count(),
        "generate finished"
    );
    Ok(report)
}

fn generate_one(
    fs: &dyn FileSystem,
    source: &Path,
    out_dir: &Path,
    opts: &GenerateOptions,
    claimed: &mut HashMap<PathBuf, PathBuf>,
) -> Result<FileOutcome> {
    let text = match fs.read_to_string(source) {
        Ok(text) => text,
        Err(err) => return Ok(FileOutcome::Failed(LitdagError::Other(err))),
    };

    let blocks = match extract_code_blocks(&text, &opts.extract) {
        Ok(blocks) => blocks,
        Err(err) => {
            return Ok(FileOutcome::Failed(LitdagError::Extract {
                path: source.display().to_string(),
                source: err,
            }));
        }
    };

    let Some(content) = render_blocks(&blocks) else {
        debug!(source = ?source, "no code blocks; nothing to write");
        return Ok(FileOutcome::NoCode);
    };

    let Some(name) = output_file_name(source, &opts.extension) else {
        return Ok(FileOutcome::Failed(LitdagError::ConfigError(format!(
            "cannot derive an output name from {:?}",
            source
        ))));
    };

    let target = out_dir.join(name);
    if let Some(previous) = claimed.insert(target.clone(), source.to_path_buf()) {
        warn!(
            target = ?target,
            previous = ?previous,
            source = ?source,
            "two tutorials map to the same example; the later one wins"
        );
    }

    fs.write(&target, content.as_bytes())?;
    debug!(source = ?source, target = ?target, blocks = blocks.len(), "wrote example");
    Ok(FileOutcome::Written(target))
}
