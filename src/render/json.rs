//! JSON renderer: the interchange form handed to the external pretty-printer.

use crate::model::DeclarationTree;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &DeclarationTree) -> String {
        // Plain data with string keys; serialization cannot fail.
        let mut out = serde_json::to_string_pretty(tree).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
