//! What a merge did, declaration by declaration.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "path", rename_all = "snake_case")]
pub enum MergeEvent {
    NamespaceAdded(String),
    ImportAdded(String),
    TypeAdded(String),
    /// New generated member inserted.
    MemberAdded(String),
    /// Marker-carrying member overwritten by its generated counterpart.
    MemberReplaced(String),
    /// Hand-written member kept although the generator produced a counterpart.
    MemberPreserved(String),
    /// Marker-carrying member without a generated counterpart, removed.
    MemberPruned(String),
}

impl fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespaceAdded(p) => write!(f, "added namespace {p}"),
            Self::ImportAdded(p) => write!(f, "added import {p}"),
            Self::TypeAdded(p) => write!(f, "added type {p}"),
            Self::MemberAdded(p) => write!(f, "added {p}"),
            Self::MemberReplaced(p) => write!(f, "regenerated {p}"),
            Self::MemberPreserved(p) => write!(f, "kept hand-written {p}"),
            Self::MemberPruned(p) => write!(f, "removed stale {p}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    events: Vec<MergeEvent>,
}

impl MergeReport {
    pub(crate) fn record(&mut self, event: MergeEvent) {
        tracing::debug!(%event, "merge");
        self.events.push(event);
    }

    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn count(&self, pred: impl Fn(&MergeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// One-line tally, e.g. `2 added, 1 regenerated, 0 kept, 1 removed`.
    pub fn summary(&self) -> String {
        let added = self.count(|e| {
            matches!(
                e,
                MergeEvent::NamespaceAdded(_)
                    | MergeEvent::ImportAdded(_)
                    | MergeEvent::TypeAdded(_)
                    | MergeEvent::MemberAdded(_)
            )
        });
        let replaced = self.count(|e| matches!(e, MergeEvent::MemberReplaced(_)));
        let preserved = self.count(|e| matches!(e, MergeEvent::MemberPreserved(_)));
        let pruned = self.count(|e| matches!(e, MergeEvent::MemberPruned(_)));
        format!("{added} added, {replaced} regenerated, {preserved} kept, {pruned} removed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_outcome() {
        let mut report = MergeReport::default();
        report.record(MergeEvent::TypeAdded("Shop.Invoice".into()));
        report.record(MergeEvent::MemberAdded("Shop.Order.Qux()".into()));
        report.record(MergeEvent::MemberReplaced("Shop.Order.Foo".into()));
        report.record(MergeEvent::MemberPruned("Shop.Order.Bar()".into()));
        assert_eq!(report.summary(), "2 added, 1 regenerated, 0 kept, 1 removed");
    }

    #[test]
    fn events_serialize_with_path() {
        let json = serde_json::to_string(&MergeEvent::MemberPruned("A.B.c".into())).unwrap();
        assert_eq!(json, r#"{"event":"member_pruned","path":"A.B.c"}"#);
    }
}
