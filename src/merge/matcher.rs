//! Decide whether two members denote the same declaration.

use crate::model::{Member, MemberKind};

/// Kinds that may share a name inside one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Field,
    Property,
    NestedType,
    Callable,
}

fn family(kind: MemberKind) -> Family {
    match kind {
        MemberKind::Field => Family::Field,
        MemberKind::Property => Family::Property,
        MemberKind::NestedType => Family::NestedType,
        MemberKind::Method | MemberKind::Constructor => Family::Callable,
    }
}

/// Is `existing` the declaration `candidate` stands for?
///
/// Callables match when their parameter lists have the same length and every
/// parameter type of `candidate` appears somewhere in `existing`. This is a
/// membership test, not positional equality: `M(int, int)` matches
/// `M(int, string)` as an existing member. Kept as is, since stricter matching
/// changes which hand-written overloads survive a merge.
pub fn matches(existing: &Member, candidate: &Member) -> bool {
    if existing.name != candidate.name {
        return false;
    }
    match (family(existing.kind()), family(candidate.kind())) {
        (Family::Callable, Family::Callable) => {
            let ours = existing.signature();
            let theirs = candidate.signature();
            ours.len() == theirs.len() && theirs.iter().all(|ty| ours.contains(ty))
        }
        (a, b) => a == b,
    }
}

/// Index of the first member of `members` matching `candidate`.
pub fn find(members: &[Member], candidate: &Member) -> Option<usize> {
    members.iter().position(|existing| matches(existing, candidate))
}

/// Same name, incompatible kind.
pub fn clashes(existing: &Member, candidate: &Member) -> bool {
    existing.name == candidate.name && family(existing.kind()) != family(candidate.kind())
}
