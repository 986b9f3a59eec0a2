//! Split a property's combined accessor text into `get` and `set` bodies.

use crate::error::{RegenError, Result};
use crate::model::Accessors;

/// Split the text between a property's outer braces.
///
/// `line` is only used for error reporting.
pub fn split_accessors(blob: &str, member: &str, line: usize) -> Result<Accessors> {
    let text = blob.trim_start();

    if let Some(rest) = strip_keyword(text, "get") {
        let (get, rest) = take_accessor(rest, "get", member, line)?;
        let set = match strip_keyword(rest.trim_start(), "set") {
            Some(after) => Some(take_accessor(after, "set", member, line)?.0),
            None => None,
        };
        return Ok(Accessors {
            get: Some(get),
            set,
        });
    }

    if let Some(rest) = strip_keyword(text, "set") {
        let (set, _) = take_accessor(rest, "set", member, line)?;
        return Ok(Accessors { get: None, set: Some(set) });
    }

    Ok(Accessors::default())
}

/// `text` without a leading `keyword`, when the keyword stands alone.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// Read one accessor body following its keyword. Returns the trimmed body
/// and the text after it. `get;` style accessors have an empty body.
fn take_accessor<'a>(
    after_keyword: &'a str,
    keyword: &str,
    member: &str,
    line: usize,
) -> Result<(String, &'a str)> {
    let text = after_keyword.trim_start();
    if let Some(rest) = text.strip_prefix(';') {
        return Ok((String::new(), rest));
    }
    let Some(inner) = text.strip_prefix('{') else {
        return Err(RegenError::malformed(
            member,
            line,
            format!("expected `{{` or `;` after `{keyword}`"),
        ));
    };

    let mut depth = 1usize;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((inner[..i].trim().to_string(), &inner[i + 1..]));
                }
            }
            _ => {}
        }
    }

    Err(RegenError::malformed(
        member,
        line,
        format!("unterminated `{keyword}` accessor"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_and_setter() {
        let blob = "        get { return this.name; }\n        set { this.name = value; }";
        let acc = split_accessors(blob, "Name", 10).unwrap();
        assert_eq!(acc.get.as_deref(), Some("return this.name;"));
        assert_eq!(acc.set.as_deref(), Some("this.name = value;"));
    }

    #[test]
    fn getter_with_nested_braces() {
        let blob = "get {\n    if (cache == null) {\n        cache = Load();\n    }\n    return cache;\n}";
        let acc = split_accessors(blob, "Cache", 1).unwrap();
        assert_eq!(
            acc.get.as_deref(),
            Some("if (cache == null) {\n        cache = Load();\n    }\n    return cache;")
        );
        assert_eq!(acc.set, None);
    }

    #[test]
    fn setter_only() {
        let acc = split_accessors("  set { this.id = value; }", "Id", 1).unwrap();
        assert_eq!(acc.get, None);
        assert_eq!(acc.set.as_deref(), Some("this.id = value;"));
    }

    #[test]
    fn auto_accessors() {
        let acc = split_accessors("get; set;", "Code", 1).unwrap();
        assert_eq!(acc.get.as_deref(), Some(""));
        assert_eq!(acc.set.as_deref(), Some(""));
    }

    #[test]
    fn no_accessor_keyword() {
        let acc = split_accessors("return 1;", "Weird", 1).unwrap();
        assert_eq!(acc, Accessors::default());
    }

    #[test]
    fn keyword_prefix_of_identifier_is_not_an_accessor() {
        let acc = split_accessors("getter();", "Odd", 1).unwrap();
        assert_eq!(acc, Accessors::default());
    }

    #[test]
    fn unterminated_getter_is_fatal() {
        let err = split_accessors("get { return x;", "X", 4).unwrap_err();
        assert!(matches!(err, RegenError::MalformedBody { line: 4, .. }));
    }

    #[test]
    fn keyword_without_body_is_fatal() {
        let err = split_accessors("get => x;", "X", 4).unwrap_err();
        assert!(err.to_string().contains("after `get`"));
    }
}
