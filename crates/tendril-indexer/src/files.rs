//! Resolve user supplied patterns to file identities

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::Glob;
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::filter::is_glob;
use crate::languages::{self, javascript::normalize};

/// Expand a file, directory or glob pattern into the supported source files
/// it names, as sorted, deduplicated identities.
///
/// Relative patterns are taken relative to `root`. Directory walks honor
/// `.gitignore` files.
pub fn resolve_pattern(root: &Path, pattern: &str) -> Result<Vec<String>> {
    let mut files = if is_glob(pattern) {
        let absolute = absolute_pattern(root, pattern);
        let matcher = Glob::new(&absolute)
            .with_context(|| format!("Invalid glob pattern: {pattern}"))?
            .compile_matcher();
        walk(root)
            .into_iter()
            .filter(|path| matcher.is_match(path))
            .collect()
    } else {
        let path = normalize(&root.join(pattern));
        if path.is_file() {
            vec![path]
        } else if path.is_dir() {
            walk(&path)
        } else {
            bail!("{} does not exist", path.display());
        }
    };

    files.sort();
    files.dedup();
    debug!("Pattern {:?} resolved to {} file(s)", pattern, files.len());
    Ok(files
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

/// Resolve several patterns, keeping first-seen order across them.
pub fn resolve_patterns<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        for file in resolve_pattern(root, pattern.as_ref())? {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    Ok(files)
}

/// Anchor a relative pattern at `root` so it can be matched against
/// identities. Leading `**` patterns already match anywhere.
pub fn absolute_pattern(root: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() || pattern.starts_with("**") {
        pattern.to_string()
    } else if is_glob(pattern) {
        let root = root.to_string_lossy();
        let pattern = pattern.trim_start_matches("./");
        format!("{}/{}", root.trim_end_matches('/'), pattern)
    } else {
        normalize(&root.join(pattern)).to_string_lossy().into_owned()
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkBuilder::new(dir).sort_by_file_name(|a, b| a.cmp(b)).build() {
        match entry {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                if is_file && languages::is_supported(entry.path()) {
                    files.push(normalize(entry.path()));
                }
            }
            Err(err) => warn!("Cannot read entry: {}", err),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestRepo;

    fn fixture() -> TestRepo {
        let repo = TestRepo::new();
        repo.write("src/index.ts", "");
        repo.write("src/util/a.ts", "");
        repo.write("src/util/b.js", "");
        repo.write("src/util/readme.md", "");
        repo.write("src/util/a.test.ts", "");
        repo
    }

    #[test]
    fn test_resolve_file() {
        let repo = fixture();
        let files = resolve_pattern(repo.root(), "src/index.ts").unwrap();
        assert_eq!(files, vec![repo.id("src/index.ts")]);
    }

    #[test]
    fn test_resolve_directory_skips_unsupported() {
        let repo = fixture();
        let files = resolve_pattern(repo.root(), "src/util").unwrap();
        assert_eq!(
            files,
            vec![repo.id("src/util/a.test.ts"), repo.id("src/util/a.ts"), repo.id("src/util/b.js")]
        );
    }

    #[test]
    fn test_resolve_glob() {
        let repo = fixture();
        let files = resolve_pattern(repo.root(), "src/**/*.test.ts").unwrap();
        assert_eq!(files, vec![repo.id("src/util/a.test.ts")]);
    }

    #[test]
    fn test_resolve_missing_path() {
        let repo = fixture();
        let err = resolve_pattern(repo.root(), "nope").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_patterns_dedups() {
        let repo = fixture();
        let files = resolve_patterns(repo.root(), &["src/index.ts", "src", "src/index.ts"]).unwrap();
        assert_eq!(files[0], repo.id("src/index.ts"));
        assert_eq!(files.len(), 4);
    }

    #[test]
    fn test_absolute_pattern() {
        let root = Path::new("/repo");
        assert_eq!(absolute_pattern(root, "src/*.ts"), "/repo/src/*.ts");
        assert_eq!(absolute_pattern(root, "./src/*.ts"), "/repo/src/*.ts");
        assert_eq!(absolute_pattern(root, "**/*.ts"), "**/*.ts");
        assert_eq!(absolute_pattern(root, "src/../lib"), "/repo/lib");
        assert_eq!(absolute_pattern(root, "/abs/x.ts"), "/abs/x.ts");
    }
}
