//! Verbatim extraction: fill a parsed tree with the source text it came from.
//!
//! The parser gives every member a first line but normalizes bodies away.
//! This pass recovers method/constructor bodies, property accessors and field
//! comments straight from the document, using the line ranges computed by
//! [`index`].

pub mod accessor;
pub mod body;
pub mod field;
pub mod index;

use crate::error::{RegenError, Result};
use crate::model::{Accessors, DeclarationTree, Document, Member, MemberBody, TypeDeclaration};
use index::{Close, LineRange};
use regex::Regex;
use std::sync::LazyLock;

// -- Line classification ------------------------------------------------------

static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*$").unwrap());

static RE_LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*//").unwrap());

static RE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*\[").unwrap());

static RE_FOLD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*#region\b[ \t]*(.*?)[ \t]*$").unwrap());

static RE_FOLD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*#endregion\b").unwrap());

pub(crate) fn is_blank(line: &str) -> bool {
    RE_BLANK.is_match(line)
}

pub(crate) fn is_line_comment(line: &str) -> bool {
    RE_LINE_COMMENT.is_match(line)
}

pub(crate) fn is_attribute(line: &str) -> bool {
    RE_ATTRIBUTE.is_match(line)
}

/// Name of the region opened by a `#region` line.
pub(crate) fn fold_open(line: &str) -> Option<String> {
    RE_FOLD_OPEN.captures(line).map(|caps| caps[1].to_string())
}

pub(crate) fn fold_close(line: &str) -> bool {
    RE_FOLD_CLOSE.is_match(line)
}

/// Lines that may trail a body without belonging to it.
pub(crate) fn is_trailing_noise(line: &str) -> bool {
    is_blank(line)
        || is_line_comment(line)
        || is_attribute(line)
        || fold_close(line)
        || RE_FOLD_OPEN.is_match(line)
}

// -- Tree walk ----------------------------------------------------------------

/// Extract the bodies of every member in `tree` from `doc`, in place.
///
/// Fails on the first member whose body cannot be recovered; the tree is
/// then partially filled and must be discarded.
pub fn extract_tree(doc: &Document, tree: &mut DeclarationTree) -> Result<()> {
    let doc_end = doc.line_count() + 1;
    let next_ns_starts: Vec<Option<usize>> = tree
        .namespaces
        .iter()
        .skip(1)
        .map(|ns| ns.first_line)
        .chain(std::iter::once(None))
        .collect();

    for (ns, next_ns_start) in tree.namespaces.iter_mut().zip(next_ns_starts) {
        // Where the namespace's last type ends, and how many scopes are
        // still open there besides the type itself.
        let (ns_end, ns_scopes) = match ns.closing_line {
            Some(line) => (line, 0),
            None => (next_ns_start.unwrap_or(doc_end), usize::from(ns.is_braced())),
        };

        let next_type_starts: Vec<Option<usize>> = ns
            .types
            .iter()
            .skip(1)
            .map(|t| t.first_line)
            .chain(std::iter::once(None))
            .collect();

        for (decl, next_start) in ns.types.iter_mut().zip(next_type_starts) {
            let close = match (decl.closing_line, next_start) {
                (Some(line), _) => Close::At(line),
                (None, Some(next)) => Close::Open { end: next, scopes: 1 },
                (None, None) => Close::Open {
                    end: ns_end,
                    scopes: 1 + ns_scopes,
                },
            };
            extract_type(doc, decl, close, 0)?;
        }
    }
    Ok(())
}

fn extract_type(doc: &Document, decl: &mut TypeDeclaration, close: Close, depth: usize) -> Result<()> {
    // Abstract members have no body and may come without a line.
    let mut located: Vec<(usize, usize)> = Vec::with_capacity(decl.members.len());
    for (i, member) in decl.members.iter().enumerate() {
        match member.first_line {
            Some(line) => located.push((i, line)),
            None if member.is_abstract => {}
            None => {
                return Err(RegenError::Parse(format!(
                    "member `{}` of `{}` has no line annotation",
                    member.name, decl.name
                )))
            }
        }
    }
    let first_lines: Vec<usize> = located.iter().map(|&(_, line)| line).collect();
    let ranges = index::member_ranges(&first_lines, close);

    for (&(i, _), range) in located.iter().zip(ranges) {
        extract_member(doc, &mut decl.members[i], &range, depth)?;
    }
    Ok(())
}

fn extract_member(doc: &Document, member: &mut Member, range: &LineRange, depth: usize) -> Result<()> {
    tracing::debug!(
        member = %member.name,
        kind = %member.kind(),
        start = range.start,
        end = range.end,
        depth,
        "extracting"
    );

    let Member {
        name,
        is_abstract,
        fold,
        body,
        ..
    } = member;

    match body {
        MemberBody::Field { doc_comment, .. } => {
            *doc_comment = field::doc_comment(doc, range.start);
        }
        MemberBody::Method { body: text, .. } | MemberBody::Constructor { body: text, .. } => {
            if *is_abstract {
                text.clear();
            } else {
                let extracted = body::extract_body(doc, range, name)?;
                *text = extracted.text;
                *fold = extracted.fold;
            }
        }
        MemberBody::Property { accessors, .. } => {
            if *is_abstract {
                *accessors = Accessors::default();
            } else {
                let extracted = body::extract_body(doc, range, name)?;
                *accessors = accessor::split_accessors(&extracted.text, name, range.start)?;
                *fold = extracted.fold;
            }
        }
        MemberBody::NestedType(decl) => {
            let close = range.nested_close(decl.closing_line);
            extract_type(doc, decl, close, depth + 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegenError;
    use crate::model::{Marker, Namespace};

    const ORDER_CS: &str = "\
using System;

namespace Shop {
    public class Order {
        // Order number.
        [Generate]
        private int number;

        [Generate]
        public int Number {
            get { return this.number; }
            set { this.number = value; }
        }

        public void Ship(string carrier) {
            if (carrier == null) {
                throw new ArgumentNullException();
            }
            Send(carrier);
        }

        public class Line {
            public void Print() {
                Console.WriteLine(this);
            }
        }
    }
}
";

    fn order_tree() -> DeclarationTree {
        let line = TypeDeclaration {
            name: "Line".into(),
            members: vec![Member::method("Print", &[]).at_line(23)],
            first_line: Some(22),
            ..Default::default()
        };
        DeclarationTree {
            namespaces: vec![Namespace {
                name: "Shop".into(),
                imports: vec!["System".into()],
                types: vec![TypeDeclaration {
                    name: "Order".into(),
                    members: vec![
                        Member::new(
                            "number",
                            MemberBody::Field {
                                type_name: "int".into(),
                                doc_comment: vec!["// stale comment from the parser".into()],
                            },
                        )
                        .with_marker(Marker::Generate)
                        .at_line(6),
                        Member::property("Number", "int").with_marker(Marker::Generate).at_line(9),
                        Member::method("Ship", &["string"]).at_line(15),
                        Member::nested(line).at_line(22),
                    ],
                    first_line: Some(4),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn fills_every_member_kind() {
        let doc = Document::new(ORDER_CS);
        let mut tree = order_tree();
        extract_tree(&doc, &mut tree).unwrap();

        let members = &tree.namespaces[0].types[0].members;
        // Whatever comment the parser attached gives way to the source's.
        assert_eq!(members[0].doc_comment(), Some(&["// Order number.".to_string()][..]));

        let acc = members[1].accessors().unwrap();
        assert_eq!(acc.get.as_deref(), Some("return this.number;"));
        assert_eq!(acc.set.as_deref(), Some("this.number = value;"));

        assert_eq!(
            members[2].body_text(),
            Some(
                "            if (carrier == null) {\n                throw new ArgumentNullException();\n            }\n            Send(carrier);"
            )
        );

        let nested = members[3].nested_type().unwrap();
        assert_eq!(
            nested.members[0].body_text(),
            Some("                Console.WriteLine(this);")
        );
    }

    #[test]
    fn known_closing_lines_are_used() {
        let doc = Document::new(ORDER_CS);
        let mut tree = order_tree();
        tree.namespaces[0].types[0].closing_line = Some(27);
        tree.namespaces[0].closing_line = Some(28);
        if let Some(nested) = tree.namespaces[0].types[0].members[3].nested_type_mut() {
            nested.closing_line = Some(26);
        }
        extract_tree(&doc, &mut tree).unwrap();

        let nested = tree.namespaces[0].types[0].members[3].nested_type().unwrap();
        assert_eq!(
            nested.members[0].body_text(),
            Some("                Console.WriteLine(this);")
        );
    }

    #[test]
    fn abstract_members_are_skipped() {
        let doc = Document::new("abstract class Shape {\n    public abstract double Area();\n}\n");
        let mut area = Member::method("Area", &[]).at_line(2);
        area.is_abstract = true;
        let mut tree = DeclarationTree {
            namespaces: vec![Namespace {
                types: vec![TypeDeclaration {
                    name: "Shape".into(),
                    members: vec![area],
                    first_line: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        extract_tree(&doc, &mut tree).unwrap();
        assert_eq!(tree.namespaces[0].types[0].members[0].body_text(), Some(""));
    }

    #[test]
    fn member_without_line_is_rejected() {
        let doc = Document::new("class C {\n    void Custom() {\n        handWritten();\n    }\n}\n");
        let mut tree = DeclarationTree {
            namespaces: vec![Namespace {
                types: vec![TypeDeclaration {
                    name: "C".into(),
                    members: vec![Member::method("Custom", &[])],
                    first_line: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        let err = extract_tree(&doc, &mut tree).unwrap_err();
        assert_eq!(
            err,
            RegenError::Parse("member `Custom` of `C` has no line annotation".into())
        );
    }

    #[test]
    fn abstract_member_without_line_is_fine() {
        let doc = Document::new("abstract class Shape {\n    public abstract double Area();\n}\n");
        let mut area = Member::method("Area", &[]);
        area.is_abstract = true;
        let mut tree = DeclarationTree {
            namespaces: vec![Namespace {
                types: vec![TypeDeclaration {
                    name: "Shape".into(),
                    members: vec![area],
                    first_line: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        assert!(extract_tree(&doc, &mut tree).is_ok());
    }

    #[test]
    fn global_namespace_has_no_brace() {
        let doc = Document::new("class Plain {\n    void Run() {\n        go();\n    }\n}\n");
        let mut tree = DeclarationTree {
            namespaces: vec![Namespace {
                types: vec![TypeDeclaration {
                    name: "Plain".into(),
                    members: vec![Member::method("Run", &[]).at_line(2)],
                    first_line: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        extract_tree(&doc, &mut tree).unwrap();
        assert_eq!(tree.namespaces[0].types[0].members[0].body_text(), Some("        go();"));
    }

    #[test]
    fn malformed_member_aborts_document() {
        let doc = Document::new("class Bad {\n    void Run()\n        go();\n}\n");
        let mut tree = DeclarationTree {
            namespaces: vec![Namespace {
                types: vec![TypeDeclaration {
                    name: "Bad".into(),
                    members: vec![Member::method("Run", &[]).at_line(2)],
                    closing_line: Some(4),
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        let err = extract_tree(&doc, &mut tree).unwrap_err();
        assert!(matches!(err, RegenError::MalformedBody { ref member, .. } if member == "Run"));
    }

    #[test]
    fn classifies_trailing_lines() {
        assert!(is_trailing_noise("   "));
        assert!(is_trailing_noise("    // note"));
        assert!(is_trailing_noise("    [Generate]"));
        assert!(is_trailing_noise("  #region Accessors"));
        assert!(is_trailing_noise("  #endregion"));
        assert!(!is_trailing_noise("    }"));
        assert!(!is_trailing_noise("    #regional()"));
        assert_eq!(fold_open("  #region Data Access  ").as_deref(), Some("Data Access"));
    }
}
