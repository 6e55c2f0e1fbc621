//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use tendril_core::{
    explain as explain_edges, explanation_lines, export_graph, load_cycles, render_html, FileInfo,
    Graph,
};
use tendril_indexer::{
    default_workers, files, BuildOptions, Config, ErrorPolicy, GraphBuilder, JavaScriptParser, LogCallbacks,
    NodeParser, PatternFilter,
};
use tendril_render::Board;
use tokio::sync::watch;

use crate::assets;

/// Everything a command needs: the analysis root, its configuration and
/// the settings derived from both.
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub workers: usize,
    pub on_error: ErrorPolicy,
}

impl Session {
    pub fn open(root: &Path, workers: Option<usize>, continue_on_error: bool) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Cannot open root {}", root.display()))?;
        let config = Config::load(&root)?;
        tracing::debug!("Analysis root: {}", root.display());

        Ok(Session {
            workers: workers.or(config.workers).unwrap_or_else(default_workers),
            on_error: config.error_policy(continue_on_error),
            root,
            config,
        })
    }

    fn parser(&self) -> anyhow::Result<JavaScriptParser> {
        let exclude: Vec<String> = self
            .config
            .exclude
            .iter()
            .map(|pattern| files::absolute_pattern(&self.root, pattern))
            .collect();
        let exclude = PatternFilter::new(&exclude).context("Invalid exclude pattern")?;
        Ok(JavaScriptParser::new(&self.root).with_exclude(exclude))
    }

    fn options(&self, filter: Option<PatternFilter>) -> BuildOptions {
        BuildOptions {
            workers: self.workers,
            on_error: self.on_error,
            filter,
        }
    }

    fn resolve(&self, patterns: &[String]) -> anyhow::Result<Vec<String>> {
        let files = files::resolve_patterns(&self.root, patterns)?;
        if files.is_empty() {
            bail!("No supported source files match {}", patterns.join(", "));
        }
        Ok(files)
    }

    /// Build the graph reachable from `seeds`. Ctrl-C cancels the build.
    async fn build(
        &self,
        parser: Arc<JavaScriptParser>,
        seeds: Vec<String>,
        filter: Option<PatternFilter>,
    ) -> anyhow::Result<Graph<FileInfo>> {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping build");
                let _ = cancel_tx.send(true);
            }
        });

        let builder = GraphBuilder::new(parser)
            .with_callbacks(Arc::new(LogCallbacks::new(&self.root)))
            .with_options(self.options(filter))
            .with_cancellation(cancel_rx);
        let output = builder.load_graph(seeds).await;
        interrupt.abort();

        if !output.failures.is_empty() && output.error.is_none() {
            tracing::warn!("{} file(s) could not be parsed", output.failures.len());
        }
        let graph = output.into_result()?;
        tracing::info!("Indexed {} files, {} imports", graph.node_count(), graph.edge_count());
        Ok(graph)
    }
}

pub async fn tree(session: &Session, patterns: &[String], color: bool) -> anyhow::Result<()> {
    let seeds = session.resolve(patterns)?;
    let parser = Arc::new(session.parser()?);
    let graph = session.build(Arc::clone(&parser), seeds, None).await?;

    let cycles = load_cycles(&graph);
    let board = Board::from_graph(&graph, &cycles, |node| parser.display(node));
    print!("{}", board.render(color));

    if !cycles.is_empty() {
        tracing::warn!("{} circular dependencies detected", cycles.len());
    }
    Ok(())
}

pub async fn check(session: &Session, patterns: &[String]) -> anyhow::Result<()> {
    let patterns = if patterns.is_empty() {
        session.config.check.entrypoints.clone()
    } else {
        patterns.to_vec()
    };
    if patterns.is_empty() {
        bail!("No entrypoints given and none configured in check.entrypoints");
    }

    let seeds = session.resolve(&patterns)?;
    let parser = Arc::new(session.parser()?);
    let graph = session.build(Arc::clone(&parser), seeds, None).await?;
    let cycles = load_cycles(&graph);

    if cycles.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular dependencies:",
        cycles.len().to_string().red().bold()
    );
    for (from, to) in cycles.iter() {
        let display = |id: &str| {
            graph
                .get(id)
                .map(|node| parser.display(node))
                .unwrap_or_else(|| id.to_string())
        };
        println!("  {} -> {}", display(from), display(to));
    }

    if session.config.check.allow_circular_dependencies {
        return Ok(());
    }
    bail!("Found {} circular dependencies", cycles.len())
}

pub async fn explain(session: &Session, from: &str, to: &str) -> anyhow::Result<()> {
    let from_files = session.resolve(&[from.to_string()])?;
    let to_files = session.resolve(&[to.to_string()])?;

    // Only files inside either side are worth expanding
    let filter = PatternFilter::new(&[
        files::absolute_pattern(&session.root, from),
        files::absolute_pattern(&session.root, to),
    ])?;

    let parser = Arc::new(session.parser()?);
    let graph = session
        .build(Arc::clone(&parser), from_files.clone(), Some(filter))
        .await?;

    let edges = explain_edges(&graph, &from_files, &to_files);
    for line in explanation_lines(&edges, |node| parser.display(node)) {
        println!("{line}");
    }
    Ok(())
}

pub async fn render(
    session: &Session,
    patterns: &[String],
    json: bool,
    output: Option<PathBuf>,
    open_browser: bool,
) -> anyhow::Result<()> {
    let seeds = session.resolve(patterns)?;
    let parser = Arc::new(session.parser()?);
    let graph = session.build(parser, seeds, None).await?;
    let cycles = load_cycles(&graph);
    let document = export_graph(&graph, &cycles);

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    let html = render_html(&document, &assets::index_template()?)?;
    let path = output.unwrap_or_else(|| std::env::temp_dir().join(assets::INDEX));
    std::fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());

    if open_browser {
        open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    }
    Ok(())
}
