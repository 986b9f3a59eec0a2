//! Line-range index: where each member's text lives in the document.
//!
//! A member runs from its first line up to the line before its next sibling.
//! The last member runs to the enclosing bound, which is either the type's
//! known closing line or an open "end of type" bound inherited from the
//! enclosing scope.

/// How the body of a type ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Close {
    /// The type's closing brace sits on this line.
    At(usize),
    /// Closing line unknown. The span runs up to `end` (exclusive) and
    /// contains the closing braces of `scopes` enclosing scopes.
    Open { end: usize, scopes: usize },
}

/// Half-open `[start, end)` line range of one member, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
    /// Last member of its type.
    pub is_final: bool,
    /// Closing braces of enclosing scopes trailing the member's own body.
    /// Only non-zero for a final member under an open bound.
    pub open_scopes: usize,
}

impl LineRange {
    /// Inclusive last line.
    pub fn last_line(&self) -> usize {
        self.end.saturating_sub(1).max(self.start)
    }

    /// The bound a nested type declared over this range hands to its members.
    pub fn nested_close(&self, closing_line: Option<usize>) -> Close {
        match closing_line {
            Some(line) => Close::At(line),
            None => Close::Open {
                end: self.end,
                scopes: self.open_scopes + 1,
            },
        }
    }
}

/// Compute member ranges from the members' first lines, in source order.
pub fn member_ranges(first_lines: &[usize], close: Close) -> Vec<LineRange> {
    let mut ranges = Vec::with_capacity(first_lines.len());
    for (i, &start) in first_lines.iter().enumerate() {
        let range = match first_lines.get(i + 1) {
            Some(&next) => LineRange {
                start,
                end: next,
                is_final: false,
                open_scopes: 0,
            },
            None => match close {
                Close::At(line) => LineRange {
                    start,
                    end: line,
                    is_final: true,
                    open_scopes: 0,
                },
                Close::Open { end, scopes } => LineRange {
                    start,
                    end,
                    is_final: true,
                    open_scopes: scopes,
                },
            },
        };
        ranges.push(range);
    }
    ranges
}
