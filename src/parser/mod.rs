//! Parser seam: turns an artifact's text into a line-annotated tree.
//!
//! Parsing itself belongs to an external tool; [`sidecar`] accepts that
//! tool's JSON output and checks it against the document it describes.

pub mod sidecar;

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::model::{DeclarationTree, Document};

/// Anything that can produce a declaration tree for a document.
///
/// Every member of the returned tree must carry its `first_line`.
/// Warnings go to `diagnostics`; only unusable input is an error.
pub trait Parser {
    fn parse(&self, document: &Document, diagnostics: &mut Diagnostics) -> Result<DeclarationTree>;
}

pub use sidecar::{ParsedArtifact, SidecarParser};
