//! Trees produced ahead of time by an external parser.
//!
//! The external parser writes a `ParsedArtifact` JSON file next to the
//! artifact (`Foo.cs.tree.json` for `Foo.cs`). Its line annotations drive
//! extraction, so they are validated against the actual document before use.

use super::Parser;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{RegenError, Result};
use crate::model::{DeclarationTree, Document, TypeDeclaration};
use serde::{Deserialize, Serialize};

/// External parser output: the tree plus whatever it reported while parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedArtifact {
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    pub tree: DeclarationTree,
}

pub struct SidecarParser {
    artifact: ParsedArtifact,
}

impl SidecarParser {
    pub fn new(artifact: ParsedArtifact) -> Self {
        Self { artifact }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact = serde_json::from_str(json)
            .map_err(|e| RegenError::Parse(format!("invalid tree file: {e}")))?;
        Ok(Self::new(artifact))
    }
}

impl Parser for SidecarParser {
    fn parse(&self, document: &Document, diagnostics: &mut Diagnostics) -> Result<DeclarationTree> {
        diagnostics.extend(self.artifact.diagnostics.iter().cloned());

        let tree = self.artifact.tree.clone();
        let lines = document.line_count();
        for ns in &tree.namespaces {
            check_line(ns.closing_line, lines, || format!("namespace `{}`", ns.name))?;
            let mut previous = None;
            for decl in &ns.types {
                check_line(decl.first_line, lines, || format!("type `{}`", decl.name))?;
                if let (Some(prev), Some(first)) = (previous, decl.first_line) {
                    if first <= prev {
                        return Err(RegenError::Parse(format!(
                            "type `{}` starts at line {first}, before the type preceding it",
                            decl.name
                        )));
                    }
                }
                previous = decl.first_line.or(previous);
                check_type(decl, document, diagnostics)?;
            }
        }
        Ok(tree)
    }
}

/// Line annotations of one type's members, recursively.
fn check_type(decl: &TypeDeclaration, document: &Document, diagnostics: &mut Diagnostics) -> Result<()> {
    let lines = document.line_count();
    check_line(decl.closing_line, lines, || format!("type `{}`", decl.name))?;

    let mut previous: Option<usize> = None;
    for member in &decl.members {
        let Some(first) = member.first_line else {
            if member.is_abstract {
                continue;
            }
            return Err(RegenError::Parse(format!(
                "member `{}` of `{}` has no line annotation",
                member.name, decl.name
            )));
        };
        check_line(Some(first), lines, || format!("member `{}`", member.name))?;
        if let Some(prev) = previous {
            if first <= prev {
                return Err(RegenError::Parse(format!(
                    "member `{}` of `{}` starts at line {first}, not after its previous sibling (line {prev})",
                    member.name, decl.name
                )));
            }
        }
        if document.line(first).is_some_and(|l| l.trim().is_empty()) {
            diagnostics.warn(
                Some(first),
                format!("member `{}` is annotated with a blank line", member.name),
            );
        }
        previous = Some(first);

        if let Some(nested) = member.nested_type() {
            check_type(nested, document, diagnostics)?;
        }
    }

    if let (Some(close), Some(last)) = (decl.closing_line, previous) {
        if close <= last {
            return Err(RegenError::Parse(format!(
                "type `{}` closes at line {close}, before its last member (line {last})",
                decl.name
            )));
        }
    }
    Ok(())
}

fn check_line(line: Option<usize>, line_count: usize, what: impl Fn() -> String) -> Result<()> {
    match line {
        Some(n) if n == 0 || n > line_count => Err(RegenError::Parse(format!(
            "{} refers to line {n}, but the document has {line_count} lines",
            what()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    const DOC: &str = "class Order {\n    int id;\n\n    void Save() {\n    }\n}\n";

    fn sidecar(members: &str) -> String {
        format!(
            r#"{{
  "diagnostics": [{{"severity": "warning", "line": 4, "message": "unused variable"}}],
  "tree": {{"namespaces": [{{"types": [{{"name": "Order", "first_line": 1, "members": [{members}]}}]}}]}}
}}"#
        )
    }

    const GOOD_MEMBERS: &str = r#"
        {"name": "id", "first_line": 2, "body": {"kind": "field", "type_name": "int"}},
        {"name": "Save", "first_line": 4, "annotations": ["generate"], "body": {"kind": "method"}}
    "#;

    #[test]
    fn accepts_consistent_tree_and_forwards_diagnostics() {
        let parser = SidecarParser::from_json(&sidecar(GOOD_MEMBERS)).unwrap();
        let mut diags = Diagnostics::new();
        let tree = parser.parse(&Document::new(DOC), &mut diags).unwrap();

        assert_eq!(tree.namespaces[0].types[0].members.len(), 2);
        assert!(tree.namespaces[0].types[0].members[1].is_generated());
        assert_eq!(diags.records().len(), 1);
        assert_eq!(diags.records()[0].severity, Severity::Warning);
        assert_eq!(diags.records()[0].line, Some(4));
    }

    #[test]
    fn rejects_unreadable_json() {
        let err = SidecarParser::from_json("{ not json").err().unwrap();
        assert!(matches!(err, RegenError::Parse(_)));
    }

    #[test]
    fn rejects_missing_line_annotation() {
        let members = r#"{"name": "id", "body": {"kind": "field"}}"#;
        let parser = SidecarParser::from_json(&sidecar(members)).unwrap();
        let err = parser.parse(&Document::new(DOC), &mut Diagnostics::new()).unwrap_err();
        assert!(err.to_string().contains("no line annotation"), "{err}");
    }

    #[test]
    fn abstract_members_may_omit_lines() {
        let members = r#"{"name": "Area", "is_abstract": true, "body": {"kind": "method"}}"#;
        let parser = SidecarParser::from_json(&sidecar(members)).unwrap();
        assert!(parser.parse(&Document::new(DOC), &mut Diagnostics::new()).is_ok());
    }

    #[test]
    fn rejects_line_past_end_of_document() {
        let members = r#"{"name": "id", "first_line": 40, "body": {"kind": "field"}}"#;
        let parser = SidecarParser::from_json(&sidecar(members)).unwrap();
        let err = parser.parse(&Document::new(DOC), &mut Diagnostics::new()).unwrap_err();
        assert!(err.to_string().contains("the document has 6 lines"), "{err}");
    }

    #[test]
    fn rejects_out_of_order_siblings() {
        let members = r#"
            {"name": "Save", "first_line": 4, "body": {"kind": "method"}},
            {"name": "id", "first_line": 2, "body": {"kind": "field"}}
        "#;
        let parser = SidecarParser::from_json(&sidecar(members)).unwrap();
        let err = parser.parse(&Document::new(DOC), &mut Diagnostics::new()).unwrap_err();
        assert!(err.to_string().contains("not after its previous sibling"), "{err}");
    }

    #[test]
    fn warns_about_blank_first_line() {
        let members = r#"{"name": "Save", "first_line": 3, "body": {"kind": "method"}}"#;
        let parser = SidecarParser::from_json(&sidecar(members)).unwrap();
        let mut diags = Diagnostics::new();
        parser.parse(&Document::new(DOC), &mut diags).unwrap();
        assert!(diags
            .records()
            .iter()
            .any(|d| d.line == Some(3) && d.message.contains("blank line")));
    }
}
