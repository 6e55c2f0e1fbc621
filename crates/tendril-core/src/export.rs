//! JSON/HTML export of a file dependency graph

use crate::cycles::Cycles;
use crate::error::ExportError;
use crate::graph::Graph;
use crate::model::FileInfo;
use serde::{Deserialize, Serialize};

/// Marker in the HTML template that gets replaced by the graph document.
pub const GRAPH_PLACEHOLDER: &str = "const GRAPH = {}";

const GRAPH_PREFIX: &str = "const GRAPH = ";

/// Document consumed by the browser visualization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub nodes: Vec<ExportNode>,
    pub links: Vec<ExportLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: String,
    pub file_name: String,
    pub dir_name: String,
    pub loc: usize,
    /// Relative size in the range 0..=10.
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLink {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Build the export document for `graph`, marking cycle-closing edges red.
pub fn export_graph(graph: &Graph<FileInfo>, cycles: &Cycles) -> ExportDocument {
    let max_loc = graph.all_nodes().map(|n| n.data.loc).max().unwrap_or(0).max(1);

    let nodes = graph
        .all_nodes()
        .map(|node| {
            // Leaves that were never parsed carry no display path
            let display = if node.data.path.is_empty() { &node.id } else { &node.data.path };
            let (dir_name, file_name) = split_display(display);
            ExportNode {
                id: node.id.clone(),
                file_name,
                dir_name,
                loc: node.data.loc,
                size: (10.0 * node.data.loc as f64 / max_loc as f64).round() as usize,
            }
        })
        .collect();

    let links = graph
        .edges()
        .map(|(from, to)| ExportLink {
            from: from.id.clone(),
            to: to.id.clone(),
            color: cycles.contains(&from.id, &to.id).then(|| "red".to_string()),
        })
        .collect();

    ExportDocument { nodes, links }
}

/// Inject `document` into an HTML `template` containing [`GRAPH_PLACEHOLDER`].
pub fn render_html(document: &ExportDocument, template: &str) -> Result<String, ExportError> {
    if !template.contains(GRAPH_PLACEHOLDER) {
        return Err(ExportError::MissingPlaceholder(GRAPH_PLACEHOLDER));
    }
    let json = serde_json::to_string(document)?;
    Ok(template.replace(GRAPH_PLACEHOLDER, &format!("{GRAPH_PREFIX}{json}")))
}

fn split_display(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file.to_string()),
        None => ("./".to_string(), path.to_string()),
    }
}
