//! Language support for import extraction

pub mod javascript;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tree_sitter::{Language, Node, Parser};

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Dialect {
    /// Determine the dialect from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    pub fn language(&self) -> Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Extensions tried, in order, when resolving an extensionless specifier.
pub const EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

pub fn is_supported(path: &Path) -> bool {
    Dialect::from_path(path).is_some()
}

/// Every module specifier in `source`, in document order.
///
/// Covers static `import`/`export ... from`, `require("x")` and dynamic
/// `import("x")` with a plain string argument.
pub fn extract_specifiers(dialect: Dialect, source: &str) -> Result<Vec<String>> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| anyhow!("Failed to set language: {}", e))?;
    let tree = parser
        .parse(source, None)
        .context("Failed to parse content")?;

    Ok(collect_specifiers(tree.root_node(), source.as_bytes()))
}

// Iterative pre-order walk; deeply nested sources must not exhaust the stack.
fn collect_specifiers(root: Node, source: &[u8]) -> Vec<String> {
    let mut specifiers = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_named() {
            if let Some(specifier) = node_specifier(node, source) {
                specifiers.push(specifier);
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return specifiers;
            }
        }
    }
}

fn node_specifier(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "import_statement" | "export_statement" => node
            .child_by_field_name("source")
            .and_then(|s| string_literal(s, source)),
        "call_expression" => call_specifier(node, source),
        _ => None,
    }
}

fn call_specifier(node: Node, source: &[u8]) -> Option<String> {
    let function = node.child_by_field_name("function")?;
    let is_loader = match function.kind() {
        "import" => true,
        "identifier" => function.utf8_text(source).ok()? == "require",
        _ => false,
    };
    if !is_loader {
        return None;
    }

    let arguments = node.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let first = arguments.named_children(&mut cursor).next()?;
    string_literal(first, source)
}

fn string_literal(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let text = node.utf8_text(source).ok()?;
    Some(text.trim_matches(|c| c == '"' || c == '\'').to_string())
}
