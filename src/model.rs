//! Data model for declaration trees, independent of the source language.
//!
//! Trees come from the external parser (existing artifacts) or from the
//! generator, and are handed to the external renderer after a merge. The
//! serde form of these types is the interchange format with both.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw text of one source artifact plus its lines.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    lines: Vec<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.lines().map(str::to_string).collect();
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line `n`, 1-indexed.
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines `[start, end)`, 1-indexed, clamped to the document.
    pub fn slice(&self, start: usize, end: usize) -> &[String] {
        let lo = start.saturating_sub(1).min(self.lines.len());
        let hi = end.saturating_sub(1).clamp(lo, self.lines.len());
        &self.lines[lo..hi]
    }
}

/// Namespace → TypeDeclaration → Member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationTree {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
}

impl DeclarationTree {
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn namespace_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.iter_mut().find(|ns| ns.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Empty for the global namespace, which has no braces of its own.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_line: Option<usize>,
}

impl Namespace {
    pub fn is_braced(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn type_decl_mut(&mut self, name: &str) -> Option<&mut TypeDeclaration> {
        self.types.iter_mut().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    /// Declaration header: base types and modifiers. Never touched by a merge
    /// of a matched type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line: Option<usize>,
    /// Line holding the type's closing brace, when the parser reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_line: Option<usize>,
}

/// Enumerated annotation tags attached to a member by the source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// `[Generate]`: produced by the generator, safe to overwrite or remove.
    Generate,
    /// Any other attribute, carried through untouched.
    Attribute(String),
}

/// Fold-region lines dropped from the tail of a member body during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldMarks {
    /// Name of a `#region` that opened right after this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened: Option<String>,
    /// A `#endregion` followed this member.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
}

impl FoldMarks {
    pub fn is_empty(&self) -> bool {
        self.opened.is_none() && !self.closed
    }
}

/// Property accessor bodies. `None` means the accessor is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
}

/// Kind-specific payload of a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberBody {
    Field {
        #[serde(default)]
        type_name: String,
        #[serde(default)]
        doc_comment: Vec<String>,
    },
    Method {
        #[serde(default)]
        return_type: String,
        #[serde(default)]
        signature: Vec<String>,
        #[serde(default)]
        body: String,
    },
    Constructor {
        #[serde(default)]
        signature: Vec<String>,
        #[serde(default)]
        body: String,
    },
    Property {
        #[serde(default)]
        type_name: String,
        #[serde(default)]
        accessors: Accessors,
    },
    NestedType(TypeDeclaration),
}

/// Discriminant of [`MemberBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
    Property,
    NestedType,
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field => write!(f, "field"),
            Self::Method => write!(f, "method"),
            Self::Constructor => write!(f, "constructor"),
            Self::Property => write!(f, "property"),
            Self::NestedType => write!(f, "nested type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub annotations: BTreeSet<Marker>,
    /// Start of the member's textual definition, 1-indexed. Set by the parser
    /// for existing artifacts; absent on generated members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "FoldMarks::is_empty")]
    pub fold: FoldMarks,
    pub body: MemberBody,
}

impl Member {
    pub fn new(name: impl Into<String>, body: MemberBody) -> Self {
        Self {
            name: name.into(),
            annotations: BTreeSet::new(),
            first_line: None,
            is_abstract: false,
            fold: FoldMarks::default(),
            body,
        }
    }

    pub fn field(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            MemberBody::Field {
                type_name: type_name.into(),
                doc_comment: Vec::new(),
            },
        )
    }

    pub fn method(name: impl Into<String>, signature: &[&str]) -> Self {
        Self::new(
            name,
            MemberBody::Method {
                return_type: "void".to_string(),
                signature: signature.iter().map(|s| s.to_string()).collect(),
                body: String::new(),
            },
        )
    }

    pub fn constructor(name: impl Into<String>, signature: &[&str]) -> Self {
        Self::new(
            name,
            MemberBody::Constructor {
                signature: signature.iter().map(|s| s.to_string()).collect(),
                body: String::new(),
            },
        )
    }

    pub fn property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            MemberBody::Property {
                type_name: type_name.into(),
                accessors: Accessors::default(),
            },
        )
    }

    /// Nested type member; the member takes the type's name.
    pub fn nested(decl: TypeDeclaration) -> Self {
        Self::new(decl.name.clone(), MemberBody::NestedType(decl))
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.annotations.insert(marker);
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.first_line = Some(line);
        self
    }

    pub fn kind(&self) -> MemberKind {
        match self.body {
            MemberBody::Field { .. } => MemberKind::Field,
            MemberBody::Method { .. } => MemberKind::Method,
            MemberBody::Constructor { .. } => MemberKind::Constructor,
            MemberBody::Property { .. } => MemberKind::Property,
            MemberBody::NestedType(_) => MemberKind::NestedType,
        }
    }

    /// Parameter type names; empty for non-callable members.
    pub fn signature(&self) -> &[String] {
        match &self.body {
            MemberBody::Method { signature, .. } | MemberBody::Constructor { signature, .. } => {
                signature
            }
            _ => &[],
        }
    }

    pub fn is_generated(&self) -> bool {
        self.annotations.contains(&Marker::Generate)
    }

    pub fn nested_type(&self) -> Option<&TypeDeclaration> {
        match &self.body {
            MemberBody::NestedType(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn nested_type_mut(&mut self) -> Option<&mut TypeDeclaration> {
        match &mut self.body {
            MemberBody::NestedType(decl) => Some(decl),
            _ => None,
        }
    }

    /// Method/constructor body text.
    pub fn body_text(&self) -> Option<&str> {
        match &self.body {
            MemberBody::Method { body, .. } | MemberBody::Constructor { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn accessors(&self) -> Option<&Accessors> {
        match &self.body {
            MemberBody::Property { accessors, .. } => Some(accessors),
            _ => None,
        }
    }

    pub fn doc_comment(&self) -> Option<&[String]> {
        match &self.body {
            MemberBody::Field { doc_comment, .. } => Some(doc_comment),
            _ => None,
        }
    }

    /// `Name(int, string)` for callables, plain name otherwise.
    pub fn display_name(&self) -> String {
        match self.kind() {
            MemberKind::Method | MemberKind::Constructor => {
                format!("{}({})", self.name, self.signature().join(", "))
            }
            _ => self.name.clone(),
        }
    }
}
