//! Path pattern filter restricting which identities get expanded

use globset::{Glob, GlobSet, GlobSetBuilder};

/// A set of path patterns. Plain paths match themselves and everything
/// beneath them; patterns containing glob metacharacters are matched as
/// globs against the whole identity.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    prefixes: Vec<String>,
    globs: GlobSet,
    patterns: Vec<String>,
}

impl PatternFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, globset::Error> {
        let mut prefixes = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns.iter().map(AsRef::as_ref) {
            if is_glob(pattern) {
                builder.add(Glob::new(pattern)?);
            } else {
                prefixes.push(pattern.trim_end_matches('/').to_string());
            }
        }

        Ok(PatternFilter {
            prefixes,
            globs: builder.build()?,
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        })
    }

    pub fn matches(&self, id: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            id == prefix
                || (id.starts_with(prefix.as_str()) && id[prefix.len()..].starts_with('/'))
        }) || self.globs.is_match(id)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Whether `pattern` uses glob syntax rather than naming a path.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}
