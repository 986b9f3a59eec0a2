//! Fatal per-document errors.
//!
//! Any of these aborts the merge of the document being processed; callers
//! must not write partial output for it.

/// Why a regeneration of one document failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegenError {
    /// The extractor could not recover a member body from the source text.
    #[error("malformed body for `{member}` at line {line}: {reason}")]
    MalformedBody {
        member: String,
        line: usize,
        reason: String,
    },

    /// The reconciler met a situation its matching rules cannot resolve.
    #[error("cannot merge `{member}` into type `{type_name}`: {detail}")]
    InvariantViolation {
        type_name: String,
        member: String,
        detail: String,
    },

    /// The parser output could not be read or does not fit the document.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RegenError {
    pub(crate) fn malformed(member: &str, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            member: member.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_body_names_member_and_line() {
        let err = RegenError::malformed("Save", 42, "could not find closing brace");
        assert_eq!(
            err.to_string(),
            "malformed body for `Save` at line 42: could not find closing brace"
        );
    }

    #[test]
    fn invariant_violation_message() {
        let err = RegenError::InvariantViolation {
            type_name: "Customer".into(),
            member: "Name".into(),
            detail: "field conflicts with existing property".into(),
        };
        assert!(err.to_string().contains("`Name` into type `Customer`"));
    }
}
