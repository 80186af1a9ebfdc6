//! Parallel processing utilities using Rayon.
//!
//! A buffer is never shared between threads. Parallelism only spans
//! independent jobs, each owning its own buffer over a shared read-only
//! original sequence.

use crate::buffer::SequenceBuffer;
use crate::render::ResultFormat;
use crate::script::{read_script, Result as ScriptResult, RunStats, ScriptRecord, ScriptRunner};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Minimum number of jobs before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 4;

/// A named script to run against a fresh buffer.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub name: String,
    pub records: Vec<ScriptRecord>,
}

impl BatchJob {
    pub fn new(name: impl Into<String>, records: Vec<ScriptRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

/// Outcome of one batch job.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub stats: RunStats,
    pub result: String,
    pub fully_processed: bool,
}

/// Run a single job against a fresh buffer.
pub fn run_job<T>(
    original: &Arc<[T]>,
    job: &BatchJob,
    runner: &ScriptRunner,
    format: &ResultFormat,
) -> ScriptResult<BatchOutcome> {
    let mut buffer = SequenceBuffer::new(Arc::clone(original))?;
    let stats = runner.run_records(&mut buffer, &job.records)?;

    Ok(BatchOutcome {
        name: job.name.clone(),
        stats,
        result: buffer.result_to_string(format),
        fully_processed: buffer.is_fully_processed(),
    })
}

/// Run jobs in parallel. Outcomes are returned in input order.
pub fn run_batch<T>(
    original: Arc<[T]>,
    jobs: &[BatchJob],
    runner: &ScriptRunner,
    format: &ResultFormat,
) -> Vec<ScriptResult<BatchOutcome>>
where
    T: Send + Sync,
{
    if jobs.len() < PARALLEL_THRESHOLD {
        return jobs
            .iter()
            .map(|job| run_job(&original, job, runner, format))
            .collect();
    }

    jobs.par_iter()
        .map(|job| run_job(&original, job, runner, format))
        .collect()
}

/// Read script files in parallel, naming each job after its path.
pub fn read_jobs<P: AsRef<Path> + Sync>(paths: &[P]) -> ScriptResult<Vec<BatchJob>> {
    paths
        .par_iter()
        .map(|path| {
            let path: PathBuf = path.as_ref().to_path_buf();
            let records = read_script(&path)?;
            Ok(BatchJob::new(path.display().to_string(), records))
        })
        .collect()
}

/// Statistics for parallel work distribution.
#[derive(Debug, Default)]
pub struct ParallelStats {
    pub jobs: usize,
    pub completed: usize,
    pub failed: usize,
    pub total_submissions: usize,
}

impl ParallelStats {
    /// Summarize batch outcomes.
    pub fn from_outcomes(outcomes: &[ScriptResult<BatchOutcome>]) -> Self {
        let mut stats = Self {
            jobs: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(o) => {
                    stats.total_submissions += o.stats.submitted;
                    if o.fully_processed {
                        stats.completed += 1;
                    }
                }
                Err(_) => stats.failed += 1,
            }
        }
        stats
    }
}
