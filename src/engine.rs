//! One regeneration: parse the existing artifact, recover its text, merge.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::extract;
use crate::merge::{self, MergeReport};
use crate::model::{DeclarationTree, Document};
use crate::parser::Parser;

/// Result of [`Engine::regenerate`].
#[derive(Debug)]
pub struct Regeneration {
    /// The merged tree, ready for rendering.
    pub tree: DeclarationTree,
    pub report: MergeReport,
    pub diagnostics: Diagnostics,
}

pub struct Engine<P: Parser> {
    parser: P,
}

impl<P: Parser> Engine<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Merge `generated` into the artifact whose current text is `existing`.
    ///
    /// Without an existing artifact the generated tree is returned as is.
    /// Any error leaves nothing to render for this document.
    pub fn regenerate(&self, generated: DeclarationTree, existing: Option<&str>) -> Result<Regeneration> {
        let mut diagnostics = Diagnostics::new();

        let Some(text) = existing else {
            tracing::info!("no existing artifact, emitting generated tree");
            return Ok(Regeneration {
                tree: generated,
                report: MergeReport::default(),
                diagnostics,
            });
        };

        let document = Document::new(text);
        let mut tree = self.parser.parse(&document, &mut diagnostics)?;
        extract::extract_tree(&document, &mut tree)?;
        let report = merge::reconcile(&mut tree, &generated)?;

        tracing::info!(
            lines = document.line_count(),
            diagnostics = diagnostics.records().len(),
            problems = diagnostics.has_problems(),
            "merged: {}",
            report.summary()
        );

        Ok(Regeneration {
            tree,
            report,
            diagnostics,
        })
    }
}
