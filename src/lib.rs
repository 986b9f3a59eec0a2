//! regen: merge freshly generated declarations into hand-edited artifacts.
//!
//! An existing artifact is parsed into a line-annotated [`DeclarationTree`],
//! its member bodies are recovered verbatim from the text ([`extract`]), and
//! the generated tree is reconciled into it ([`merge`]). Members carrying the
//! generation marker follow the generator; everything else is kept as written.
//!
//! ```no_run
//! use regen::{DeclarationTree, Engine, SidecarParser};
//!
//! # fn run(tree_json: &str, source: &str, generated: DeclarationTree) -> regen::Result<()> {
//! let engine = Engine::new(SidecarParser::from_json(tree_json)?);
//! let merged = engine.regenerate(generated, Some(source))?;
//! println!("{}", merged.report.summary());
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod merge;
pub mod model;
pub mod parser;
pub mod render;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use engine::{Engine, Regeneration};
pub use error::{RegenError, Result};
pub use merge::{reconcile, MergeEvent, MergeReport};
pub use model::{DeclarationTree, Document, Marker, Member, MemberBody, MemberKind, Namespace, TypeDeclaration};
pub use parser::{ParsedArtifact, Parser, SidecarParser};
