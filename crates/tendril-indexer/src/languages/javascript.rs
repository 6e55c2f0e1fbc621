//! JavaScript and TypeScript file parser

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::Deserialize;
use tendril_core::{relative_display, FileInfo, Node};
use tracing::debug;

use super::{extract_specifiers, Dialect, EXTENSIONS};
use crate::filter::PatternFilter;
use crate::parser::{NodeParser, Parsed};

/// Resolves relative imports of JavaScript and TypeScript files to absolute
/// paths. Bare package imports are not followed.
pub struct JavaScriptParser {
    root: PathBuf,
    exclude: Option<PatternFilter>,
    /// `package.json` name per directory, `None` when the directory has none.
    packages: DashMap<PathBuf, Option<String>>,
}

#[derive(Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

impl JavaScriptParser {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JavaScriptParser {
            root: root.into(),
            exclude: None,
            packages: DashMap::new(),
        }
    }

    /// Drop references matching `exclude` before they reach the builder.
    pub fn with_exclude(mut self, exclude: PatternFilter) -> Self {
        self.exclude = (!exclude.is_empty()).then_some(exclude);
        self
    }

    /// Resolve `specifier` as written in a file inside `dir`.
    pub fn resolve(&self, dir: &Path, specifier: &str) -> Option<PathBuf> {
        if !is_relative(specifier) {
            return None;
        }
        let candidate = normalize(&dir.join(specifier));

        if candidate.is_file() {
            return Some(candidate);
        }

        // `./foo.js` written in TypeScript sources commonly refers to `foo.ts`
        let stem = match candidate.extension().and_then(|e| e.to_str()) {
            Some(ext) if EXTENSIONS.contains(&ext) => candidate.with_extension(""),
            _ => candidate.clone(),
        };
        for ext in EXTENSIONS {
            let file = append_extension(&stem, ext);
            if file.is_file() {
                return Some(file);
            }
        }

        if candidate.is_dir() {
            for ext in EXTENSIONS {
                let index = candidate.join(format!("index.{ext}"));
                if index.is_file() {
                    return Some(index);
                }
            }
        }

        None
    }

    /// Name of the nearest `package.json` at or above the file's directory,
    /// without looking above the analysis root.
    pub fn package_of(&self, file: &Path) -> String {
        for dir in file.ancestors().skip(1) {
            let cached = self.packages.get(dir).map(|entry| entry.value().clone());
            let name = match cached {
                Some(name) => name,
                None => {
                    // Read before inserting so no shard lock is held during I/O
                    let name = read_package_name(dir);
                    self.packages.insert(dir.to_path_buf(), name.clone());
                    name
                }
            };
            if let Some(name) = name {
                return name;
            }
            if dir == self.root {
                break;
            }
        }
        String::new()
    }
}

impl NodeParser for JavaScriptParser {
    type Payload = FileInfo;

    fn parse(&self, id: &str) -> Result<Parsed<FileInfo>> {
        let path = Path::new(id);
        let dialect = Dialect::from_path(path)
            .with_context(|| format!("Unsupported file type: {}", path.display()))?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let specifiers = extract_specifiers(dialect, &content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let dir = path.parent().unwrap_or(&self.root);
        let mut references = Vec::new();
        for specifier in specifiers {
            if !is_relative(&specifier) {
                continue;
            }
            let Some(resolved) = self.resolve(dir, &specifier) else {
                debug!("Unresolved import {:?} in {}", specifier, path.display());
                continue;
            };
            let reference = resolved.to_string_lossy().into_owned();
            if self.exclude.as_ref().is_some_and(|f| f.matches(&reference)) {
                continue;
            }
            references.push(reference);
        }

        let package = self.package_of(path);
        Ok(Parsed {
            payload: FileInfo::from_source(&self.root, path, &content, package),
            references,
        })
    }

    fn display(&self, node: &Node<FileInfo>) -> String {
        if node.data.path.is_empty() {
            relative_display(&self.root, Path::new(&node.id))
        } else {
            node.data.path.clone()
        }
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut file = path.as_os_str().to_os_string();
    file.push(".");
    file.push(ext);
    PathBuf::from(file)
}

/// Lexically remove `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn read_package_name(dir: &Path) -> Option<String> {
    let manifest = dir.join("package.json");
    let content = fs::read_to_string(&manifest).ok()?;
    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(manifest) => manifest.name,
        Err(err) => {
            debug!("Ignoring malformed {}: {}", manifest.display(), err);
            None
        }
    }
}
