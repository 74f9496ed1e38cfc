//! Solving a directory of `.tim` instances.

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::output::write_solution_file;
use crate::parser::read_instance;
use crate::solver::solve;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const INSTANCE_EXTENSION: &str = "tim";

/// One solved instance file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub file_name: String,
    pub score: f64,
    pub unassigned: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub solved: Vec<BatchEntry>,
    /// Instances that could not be read or whose solution could not be written.
    pub failed: Vec<PathBuf>,
}

/// Every `.tim` file directly inside `dir`, sorted by path.
pub fn instance_files(dir: &Path) -> Result<Vec<PathBuf>, SolveError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == INSTANCE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Solves every instance in `input_dir` and writes each solution to
/// `output_dir` under the instance's file name.
///
/// A file that fails to load or write is logged and recorded in
/// [`BatchSummary::failed`]; the remaining files are still solved.
pub fn run_batch(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SolverConfig,
) -> Result<BatchSummary, SolveError> {
    config.validate()?;
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut summary = BatchSummary::default();
    for path in instance_files(input_dir.as_ref())? {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        info!("Solving {}", path.display());

        let instance = match read_instance(&path) {
            Ok(instance) => instance,
            Err(e) => {
                error!("Skipping {}: {}", path.display(), e);
                summary.failed.push(path);
                continue;
            }
        };
        let solved = solve(&instance, config)?;

        let target = output_dir.join(file_name);
        if let Err(e) = write_solution_file(&target, &solved.solution) {
            error!("Error writing {}: {}", target.display(), e);
            summary.failed.push(path);
            continue;
        }

        summary.solved.push(BatchEntry {
            file_name: file_name.to_string_lossy().into_owned(),
            score: solved.output.score.total,
            unassigned: solved.output.unassigned_events.len(),
        });
    }

    info!(
        "Batch finished: {} solved, {} failed",
        summary.solved.len(),
        summary.failed.len()
    );
    Ok(summary)
}
