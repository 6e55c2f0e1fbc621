//! HTML template embedded with rust-embed

use rust_embed::RustEmbed;

/// Embed the assets directory at compile time
#[derive(RustEmbed)]
#[folder = "assets"]
struct Assets;

pub const INDEX: &str = "index.html";

/// The visualization page, still containing the graph placeholder.
pub fn index_template() -> anyhow::Result<String> {
    let file = Assets::get(INDEX).ok_or_else(|| anyhow::anyhow!("Embedded {INDEX} is missing"))?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}
