//! Method and constructor bodies.
//!
//! The slice of a member's line range starts at its declaration header and
//! ends just before the next sibling, so the tail carries the comments and
//! attributes of whatever follows. Those are peeled off line by line until the
//! closing brace of the body is reached.

use super::index::LineRange;
use super::{fold_close, fold_open, is_blank, is_trailing_noise};
use crate::error::{RegenError, Result};
use crate::model::{Document, FoldMarks};

/// Recovered body text plus the fold markers dropped from its tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub text: String,
    pub fold: FoldMarks,
}

/// Extract the text between a member's outer braces.
pub fn extract_body(doc: &Document, range: &LineRange, member: &str) -> Result<Body> {
    let joined = doc.slice(range.start, range.end).join("\n");
    let open = joined
        .find('{')
        .ok_or_else(|| RegenError::malformed(member, range.start, "could not find opening brace"))?;

    let mut lines: Vec<String> = joined[open + 1..].split('\n').map(str::to_string).collect();
    let mut fold = FoldMarks::default();

    drop_trailing_noise(&mut lines, &mut fold);
    if !remove_closing_brace(&mut lines) {
        return Err(missing_brace(member, range));
    }

    // The last member also swallows the closing braces of every scope left
    // open by an unknown type end.
    if range.is_final {
        for _ in 0..range.open_scopes {
            drop_trailing_noise(&mut lines, &mut fold);
            if !remove_closing_brace(&mut lines) {
                return Err(missing_brace(member, range));
            }
        }
    }

    let leading = lines.iter().take_while(|l| is_blank(l)).count();
    lines.drain(..leading);

    Ok(Body {
        text: lines.join("\n").trim_end().to_string(),
        fold,
    })
}

fn missing_brace(member: &str, range: &LineRange) -> RegenError {
    RegenError::malformed(member, range.last_line(), "could not find closing brace")
}

/// Drop blank, comment, attribute and fold-marker lines from the end.
fn drop_trailing_noise(lines: &mut Vec<String>, fold: &mut FoldMarks) {
    while let Some(last) = lines.last() {
        if !is_trailing_noise(last) {
            break;
        }
        if fold_close(last) {
            fold.closed = true;
        } else if let Some(name) = fold_open(last) {
            // Scanning backwards: keep the region nearest the body.
            fold.opened = Some(name);
        }
        lines.pop();
    }
}

/// Remove one closing brace from the last line: the whole line when it is a
/// lone `}`, otherwise everything from its last `}` on.
fn remove_closing_brace(lines: &mut Vec<String>) -> bool {
    let Some(last) = lines.last_mut() else {
        return false;
    };
    if last.trim() == "}" {
        lines.pop();
        return true;
    }
    match last.rfind('}') {
        Some(pos) => {
            last.truncate(pos);
            true
        }
        None => false,
    }
}
