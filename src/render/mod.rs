//! Renderer module: trait-based format dispatch for merged trees.

pub mod json;
pub mod outline;

use crate::model::DeclarationTree;
use anyhow::{anyhow, Result};

/// Trait for rendering a merged tree into a specific output format.
pub trait Renderer {
    fn render(&self, tree: &DeclarationTree) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "outline" | "md" => Ok(Box::new(outline::OutlineRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use json or outline", format)),
    }
}
