use pathfill_infer::{infer_project_path, DirOracle};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Per-record outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Updated,
    Skipped,
    Failed,
}

/// Why a single record failed. Failures are counted per record, never
/// fatal to the sweep.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("unreadable: {0}")]
    Read(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotRecord,
    #[error("write failed: {0}")]
    Write(anyhow::Error),
}

/// Sweep configuration from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepOptions {
    /// Persist changes in place; false means dry-run.
    pub write: bool,
    /// Print one line per updated record, and failure causes to stderr.
    pub verbose: bool,
}

/// Aggregate counters for one sweep.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SweepReport {
    fn count(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Updated => self.updated += 1,
            Disposition::Skipped => self.skipped += 1,
            Disposition::Failed => self.failed += 1,
        }
    }

    /// The one summary line the tool prints on completion.
    pub fn summary_line(&self, write: bool) -> String {
        let mode = if write { "write" } else { "dry-run" };
        format!(
            "mode={mode} scanned={} updated={} skipped={} failed={}",
            self.scanned, self.updated, self.skipped, self.failed
        )
    }
}

/// Process one context record file: decide its disposition and, in write
/// mode, rewrite it in place.
///
/// An existing `project_path` that already names a directory is
/// authoritative and never overwritten. Returns the disposition plus the
/// resolved path when one is known.
pub fn process_file(
    path: &Path,
    opts: &SweepOptions,
    oracle: &dyn DirOracle,
) -> (Disposition, Option<String>) {
    match try_process(path, opts, oracle) {
        Ok((disposition, resolved)) => {
            if opts.verbose && disposition == Disposition::Updated {
                if let Some(resolved) = &resolved {
                    println!("{}: {resolved}", file_label(path));
                }
            }
            (disposition, resolved)
        }
        Err(err) => {
            if opts.verbose {
                eprintln!("warn: {}: {err}", file_label(path));
            }
            (Disposition::Failed, None)
        }
    }
}

fn try_process(
    path: &Path,
    opts: &SweepOptions,
    oracle: &dyn DirOracle,
) -> Result<(Disposition, Option<String>), RecordError> {
    let text = fs::read_to_string(path)?;
    let mut record: Value = serde_json::from_str(&text)?;
    if !record.is_object() {
        return Err(RecordError::NotRecord);
    }

    // Pre-existing valid state is authoritative.
    if let Some(existing) = record.get("project_path").and_then(Value::as_str) {
        if oracle.is_abs_dir(existing) {
            return Ok((Disposition::Skipped, Some(oracle.normalize(existing))));
        }
    }

    let Some(inferred) = infer_project_path(&record, oracle) else {
        return Ok((Disposition::Skipped, None));
    };

    record["project_path"] = Value::String(inferred.clone());
    if opts.write {
        pathfill_store::write_record(path, &record).map_err(RecordError::Write)?;
    }
    Ok((Disposition::Updated, Some(inferred)))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sweep every context record under `dir`, best-effort, in sorted-name
/// order. One record is fully handled before the next is considered.
///
/// Write mode holds an advisory lock for the duration so concurrent
/// sweeps of the same directory serialize; dry-run takes no lock and
/// creates nothing on disk.
pub fn sweep_dir(
    dir: &Path,
    opts: &SweepOptions,
    oracle: &dyn DirOracle,
) -> anyhow::Result<SweepReport> {
    let _lock = if opts.write {
        Some(pathfill_store::lock_file(&dir.join(".pathfill.lock"))?)
    } else {
        None
    };

    let files = pathfill_store::list_context_files(dir)?;
    let mut report = SweepReport::default();
    for file in &files {
        report.scanned += 1;
        let (disposition, _) = process_file(file, opts, oracle);
        report.count(disposition);
    }
    Ok(report)
}
