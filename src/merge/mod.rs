//! Reconcile a freshly generated tree into the tree of an existing artifact.
//!
//! The existing tree is mutated in place and becomes the merged result.
//! Generated content wins only over members carrying the generation marker;
//! everything else in the existing tree is treated as hand-written and kept.

pub mod matcher;
pub mod report;

use crate::error::{RegenError, Result};
use crate::model::{DeclarationTree, TypeDeclaration};
pub use report::{MergeEvent, MergeReport};

/// Merge `generated` into `existing`.
pub fn reconcile(existing: &mut DeclarationTree, generated: &DeclarationTree) -> Result<MergeReport> {
    let mut report = MergeReport::default();

    for gen_ns in &generated.namespaces {
        let Some(ns_idx) = existing.namespaces.iter().position(|ns| ns.name == gen_ns.name) else {
            existing.namespaces.push(gen_ns.clone());
            report.record(MergeEvent::NamespaceAdded(display_ns(&gen_ns.name)));
            continue;
        };
        let ns = &mut existing.namespaces[ns_idx];

        for import in &gen_ns.imports {
            if !ns.imports.contains(import) {
                ns.imports.push(import.clone());
                report.record(MergeEvent::ImportAdded(format!(
                    "{} in {}",
                    import,
                    display_ns(&ns.name)
                )));
            }
        }

        for gen_type in &gen_ns.types {
            let path = qualify(&ns.name, &gen_type.name);
            match ns.types.iter().position(|t| t.name == gen_type.name) {
                Some(idx) => merge_type(&mut ns.types[idx], gen_type, &path, &mut report)?,
                None => {
                    ns.types.push(gen_type.clone());
                    report.record(MergeEvent::TypeAdded(path));
                }
            }
        }
    }

    Ok(report)
}

/// Member-level merge of one matched type pair, then pruning.
fn merge_type(
    target: &mut TypeDeclaration,
    source: &TypeDeclaration,
    path: &str,
    report: &mut MergeReport,
) -> Result<()> {
    for incoming in &source.members {
        let member_path = qualify(path, &incoming.display_name());

        let Some(idx) = matcher::find(&target.members, incoming) else {
            // A generated member of another kind is stale and gets pruned
            // below; only a hand-written one blocks the insert.
            let hand_written = target
                .members
                .iter()
                .find(|m| !m.is_generated() && matcher::clashes(m, incoming));
            if let Some(clash) = hand_written {
                return Err(RegenError::InvariantViolation {
                    type_name: path.to_string(),
                    member: incoming.name.clone(),
                    detail: format!(
                        "generated {} clashes with existing {}",
                        incoming.kind(),
                        clash.kind()
                    ),
                });
            }
            target.members.push(incoming.clone());
            report.record(MergeEvent::MemberAdded(member_path));
            continue;
        };

        let existing = &mut target.members[idx];

        // Only the members of a nested type are reconciled, never its header.
        if let Some(incoming_nested) = incoming.nested_type() {
            if let Some(nested) = existing.nested_type_mut() {
                merge_type(nested, incoming_nested, &member_path, report)?;
            }
            continue;
        }

        if existing.is_generated() {
            let fold = std::mem::take(&mut existing.fold);
            *existing = incoming.clone();
            if existing.fold.is_empty() {
                existing.fold = fold;
            }
            report.record(MergeEvent::MemberReplaced(member_path));
        } else {
            report.record(MergeEvent::MemberPreserved(member_path));
        }
    }

    target.members.retain(|existing| {
        let still_generated = source
            .members
            .iter()
            .any(|incoming| matcher::matches(incoming, existing));
        if !existing.is_generated() || still_generated {
            return true;
        }
        report.record(MergeEvent::MemberPruned(qualify(path, &existing.display_name())));
        false
    });

    Ok(())
}

fn qualify(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn display_ns(name: &str) -> String {
    if name.is_empty() {
        "<global>".to_string()
    } else {
        name.to_string()
    }
}
