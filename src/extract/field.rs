//! Field documentation: the comment block written above a field.

use super::{is_attribute, is_blank, is_line_comment};
use crate::model::Document;

/// Collect the comment lines above `first_line`, in source order.
///
/// Walks upward over blank, attribute and comment lines and stops at the
/// first line that is none of these. Comments are kept without their
/// indentation, so `first_line` may be either the declaration or its first
/// attribute.
pub fn doc_comment(doc: &Document, first_line: usize) -> Vec<String> {
    let mut collected = Vec::new();
    let mut n = first_line.saturating_sub(1);

    while let Some(line) = doc.line(n) {
        if is_line_comment(line) {
            collected.push(line.trim().to_string());
        } else if !is_blank(line) && !is_attribute(line) {
            break;
        }
        n -= 1;
    }

    collected.reverse();
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_comment_block_in_order() {
        let doc = Document::new(
            "    private int count;\n\
             \n\
             \x20   /// <summary>\n\
             \x20   /// Customer name.\n\
             \x20   /// </summary>\n\
             \n\
             \x20   private string name;\n",
        );
        assert_eq!(
            doc_comment(&doc, 7),
            vec!["/// <summary>", "/// Customer name.", "/// </summary>"]
        );
    }

    #[test]
    fn stops_at_code() {
        let doc = Document::new("    }\n    private string name;\n");
        assert!(doc_comment(&doc, 2).is_empty());
    }

    #[test]
    fn looks_past_attributes() {
        let doc = Document::new(
            "    }\n\
             \x20   // Order number.\n\
             \x20   [Generate]\n\
             \x20   [Column(\"number\")]\n\
             \x20   private int number;\n",
        );
        assert_eq!(doc_comment(&doc, 5), vec!["// Order number."]);
        assert_eq!(doc_comment(&doc, 3), vec!["// Order number."]);
    }

    #[test]
    fn first_line_of_document() {
        let doc = Document::new("int x;\n");
        assert!(doc_comment(&doc, 1).is_empty());
    }

    #[test]
    fn reaches_top_of_document() {
        let doc = Document::new("// header\n\n// about x\nint x;\n");
        assert_eq!(doc_comment(&doc, 4), vec!["// header", "// about x"]);
    }
}
