//! Markdown outline of a merged tree, for reviewing what a merge produced.
//!
//! One heading per namespace and top-level type, one bullet per member.
//! Nested types indent their members under their own bullet.

use crate::model::*;
use crate::render::Renderer;

pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, tree: &DeclarationTree) -> String {
        let mut out = String::new();

        for ns in &tree.namespaces {
            if ns.name.is_empty() {
                out.push_str("# Global namespace\n\n");
            } else {
                out.push_str(&format!("# {}\n\n", ns.name));
            }

            if !ns.imports.is_empty() {
                let imports: Vec<String> = ns.imports.iter().map(|i| format!("`{i}`")).collect();
                out.push_str(&format!("Imports: {}\n\n", imports.join(", ")));
            }

            for decl in &ns.types {
                out.push_str(&format!("## {}\n\n", type_header(decl)));
                if decl.members.is_empty() {
                    out.push_str("_No members._\n\n");
                    continue;
                }
                let mut lines = Vec::new();
                render_members(&decl.members, 0, &mut lines);
                out.push_str(&lines.join("\n"));
                out.push_str("\n\n");
            }
        }

        out
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn type_header(decl: &TypeDeclaration) -> String {
    let mut header = String::new();
    for modifier in &decl.modifiers {
        header.push_str(modifier);
        header.push(' ');
    }
    header.push_str(&decl.name);
    if !decl.bases.is_empty() {
        header.push_str(" : ");
        header.push_str(&decl.bases.join(", "));
    }
    header
}

fn render_members(members: &[Member], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for member in members {
        lines.push(format!("{indent}- {}", member_line(member)));
        if let Some(nested) = member.nested_type() {
            render_members(&nested.members, depth + 1, lines);
        }
    }
}

fn member_line(member: &Member) -> String {
    let mut line = match &member.body {
        MemberBody::Field { type_name, .. } => format!("field `{} {}`", type_name, member.name),
        MemberBody::Method {
            return_type,
            signature,
            ..
        } => format!("method `{} {}({})`", return_type, member.name, signature.join(", ")),
        MemberBody::Constructor { signature, .. } => {
            format!("constructor `{}({})`", member.name, signature.join(", "))
        }
        MemberBody::Property {
            type_name,
            accessors,
        } => format!(
            "property `{} {} {{ {}}}`",
            type_name,
            member.name,
            accessor_list(accessors)
        ),
        MemberBody::NestedType(decl) => format!("nested type `{}`", type_header(decl)),
    };

    if member.is_abstract {
        line.push_str(" _abstract_");
    }
    if member.is_generated() {
        line.push_str(" _(generated)_");
    }
    if let Some(lines) = member.body_text().map(|b| b.lines().count()).filter(|&n| n > 0) {
        line.push_str(&format!(" ({} {})", lines, if lines == 1 { "line" } else { "lines" }));
    }
    line
}

fn accessor_list(accessors: &Accessors) -> String {
    let mut list = String::new();
    if accessors.get.is_some() {
        list.push_str("get; ");
    }
    if accessors.set.is_some() {
        list.push_str("set; ");
    }
    list
}
