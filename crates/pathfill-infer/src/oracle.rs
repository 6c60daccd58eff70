use std::path::PathBuf;

/// The one filesystem question scoring is allowed to ask.
///
/// Keeping this behind a trait keeps extraction and ranking pure and
/// unit-testable against an in-memory directory set.
pub trait DirOracle {
    /// True iff `path`, after `~` expansion, is absolute and currently
    /// exists as a directory on disk.
    fn is_abs_dir(&self, path: &str) -> bool;

    /// Canonical absolute form of `path`: `~` expanded, `.`/`..` and
    /// symlinks resolved. Callers only pass strings that already satisfy
    /// `is_abs_dir`.
    fn normalize(&self, path: &str) -> String;
}

/// Oracle backed by the live filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOracle;

impl DirOracle for FsOracle {
    fn is_abs_dir(&self, path: &str) -> bool {
        let p = expand_user(path);
        p.is_absolute() && p.is_dir()
    }

    fn normalize(&self, path: &str) -> String {
        let p = expand_user(path);
        p.canonicalize()
            .unwrap_or(p)
            .to_string_lossy()
            .into_owned()
    }
}

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn expand_user(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::DirOracle;
    use std::collections::BTreeSet;

    /// In-memory oracle: a fixed set of known directories, identity
    /// normalization.
    pub struct FakeDirs {
        dirs: BTreeSet<String>,
    }

    impl FakeDirs {
        pub fn new(dirs: &[&str]) -> Self {
            Self {
                dirs: dirs.iter().map(|d| d.to_string()).collect(),
            }
        }
    }

    impl DirOracle for FakeDirs {
        fn is_abs_dir(&self, path: &str) -> bool {
            path.starts_with('/') && self.dirs.contains(path)
        }

        fn normalize(&self, path: &str) -> String {
            path.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_dir_is_abs_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(FsOracle.is_abs_dir(&tmp.path().to_string_lossy()));
    }

    #[test]
    fn regular_file_is_not_a_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(!FsOracle.is_abs_dir(&file.to_string_lossy()));
    }

    #[test]
    fn relative_and_missing_paths_rejected() {
        assert!(!FsOracle.is_abs_dir("relative/path"));
        assert!(!FsOracle.is_abs_dir("/definitely/not/here/pathfill-test"));
    }

    #[test]
    fn normalize_resolves_to_canonical_form() {
        let tmp = tempfile::tempdir().unwrap();
        let expected = tmp.path().canonicalize().unwrap();
        let got = FsOracle.normalize(&tmp.path().to_string_lossy());
        assert_eq!(got, expected.to_string_lossy());
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let dotted = format!("{}/./sub", tmp.path().to_string_lossy());
        let got = FsOracle.normalize(&dotted);
        assert_eq!(got, sub.canonicalize().unwrap().to_string_lossy());
    }

    #[test]
    fn expand_user_maps_tilde_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_user("~"), home);
            assert_eq!(expand_user("~/projects"), home.join("projects"));
        }
        // A mid-string tilde is not shorthand.
        assert_eq!(expand_user("/a/~b"), PathBuf::from("/a/~b"));
    }
}
