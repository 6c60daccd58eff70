use fs2::FileExt;
use globset::Glob;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-name pattern for per-session context records.
pub const CONTEXT_FILE_GLOB: &str = "context-*.json";

/// Per-user zagent configuration root: `~/.config/zagent`.
///
/// zagent writes its settings and context records here on every platform,
/// so this is a literal `.config` path rather than the platform config dir.
pub fn config_root() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".config").join("zagent")
    } else {
        PathBuf::from(".zagent")
    }
}

/// List context record files under `dir`, sorted by name.
///
/// A missing directory is an empty store, not an error.
pub fn list_context_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let matcher = Glob::new(CONTEXT_FILE_GLOB)?.compile_matcher();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name() {
            if matcher.is_match(name) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Persist a record: compact canonical JSON, single trailing newline,
/// atomic replace. Readers never observe a partially written file.
pub fn write_record(path: &Path, record: &Value) -> anyhow::Result<()> {
    let mut data = serde_json::to_vec(record)?;
    data.push(b'\n');
    write_atomic(path, &data)
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// File-based exclusive lock guard.
pub struct LockGuard {
    _file: fs::File,
}

/// Acquire an exclusive advisory lock. Creates the lock file if needed.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_root_is_not_empty() {
        let root = config_root();
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn list_matches_only_context_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in [
            "context-b.json",
            "context-a.json",
            "settings.json",
            "notes.txt",
        ] {
            fs::write(tmp.path().join(name), "{}").unwrap();
        }
        fs::create_dir(tmp.path().join("context-dir.json")).unwrap();

        let files = list_context_files(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["context-a.json", "context-b.json"]);
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let files = list_context_files(&tmp.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn write_record_is_compact_sorted_and_newline_terminated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("context-x.json");
        let record = serde_json::json!({"title": "t", "project_path": "/p"});

        write_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"project_path\":\"/p\",\"title\":\"t\"}\n");
    }

    #[test]
    fn write_atomic_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.txt");
        write_atomic(&path, b"hello world").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn lock_file_acquires_and_drops() {
        let tmp = tempfile::tempdir().unwrap();
        let lock_path = tmp.path().join("test.lock");
        let guard = lock_file(&lock_path).unwrap();
        assert!(lock_path.exists());
        drop(guard);
    }
}
