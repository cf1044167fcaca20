//! Pattern-based file lookup for layouts, stylesheets and includes.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Find the file `pattern` names relative to `base_dir`.
///
/// The pattern may use glob syntax (`*`, `?`, `[...]`, `**`); the base
/// directory is always matched literally. When several files match, the
/// lexicographically first path wins so builds are reproducible.
pub fn resolve(base_dir: &Path, pattern: &str) -> Result<PathBuf> {
    let not_found = || Error::NotFound {
        pattern: pattern.to_string(),
        directory: base_dir.to_path_buf(),
    };

    if pattern.trim().is_empty() {
        return Err(not_found());
    }

    let escaped_base = glob::Pattern::escape(&base_dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_base).join(pattern);

    let mut candidates = Vec::new();
    for entry in glob::glob(&full_pattern.to_string_lossy())? {
        // An unreadable directory is an I/O failure, not a missing file
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            Error::io(path, e.into_error())
        })?;
        if path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    let found = candidates.into_iter().next().ok_or_else(not_found)?;
    debug!(pattern, path = %found.display(), "resolved file pattern");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_literal_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "_layout.html");

        let found = resolve(dir.path(), "_layout.html").unwrap();
        assert_eq!(found, dir.path().join("_layout.html"));
    }

    #[test]
    fn test_wildcard_picks_first_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "theme-b.css");
        touch(dir.path(), "theme-a.css");
        touch(dir.path(), "theme-c.css");

        let found = resolve(dir.path(), "theme-*.css").unwrap();
        assert_eq!(found, dir.path().join("theme-a.css"));
    }

    #[test]
    fn test_recursive_and_parent_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "shared/layouts/_base.html");
        touch(dir.path(), "pages/welcome.html");

        let found = resolve(dir.path(), "**/_base.html").unwrap();
        assert_eq!(found, dir.path().join("shared/layouts/_base.html"));

        let pages = dir.path().join("pages");
        let found = resolve(&pages, "../shared/layouts/_base.html").unwrap();
        assert!(found.ends_with("shared/layouts/_base.html"));
    }

    #[test]
    fn test_directories_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a.html")).unwrap();
        touch(dir.path(), "b.html");

        let found = resolve(dir.path(), "*.html").unwrap();
        assert_eq!(found, dir.path().join("b.html"));
    }

    #[test]
    fn test_base_dir_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("mail [v2]");
        touch(&odd, "_layout.html");

        let found = resolve(&odd, "_layout.html").unwrap();
        assert_eq!(found, odd.join("_layout.html"));
    }

    #[test]
    fn test_not_found_carries_pattern_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(dir.path(), "missing.css").unwrap_err();
        match err {
            Error::NotFound { pattern, directory } => {
                assert_eq!(pattern, "missing.css");
                assert_eq!(directory, dir.path());
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_pattern_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(resolve(dir.path(), " "), Err(Error::NotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        touch(&locked, "_layout.html");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list the directory anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = resolve(dir.path(), "locked/*.html");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(Error::Io { path, .. }) => assert_eq!(path, locked),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(resolve(dir.path(), "a[.css"), Err(Error::Pattern(_))));
    }
}
