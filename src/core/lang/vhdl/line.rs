//! Line-level classification of an entity interface.

/// The structural role of a single source line, decided by its first token.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LineKind {
    Library,
    Use,
    Entity,
    Generic,
    Port,
    End,
    /// The `);` that closes a generic or port list.
    Delimiter,
    /// Any other text; a declaration when it appears inside a list.
    Continuation,
}

impl LineKind {
    /// Looks up a (keyword-sized) token in the fixed keyword table.
    ///
    /// The comparison is case-insensitive.
    pub fn match_keyword(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_ref() {
            "LIBRARY" => Self::Library,
            "USE" => Self::Use,
            "ENTITY" => Self::Entity,
            "GENERIC" => Self::Generic,
            "PORT" => Self::Port,
            "END" => Self::End,
            ");" | ")" => Self::Delimiter,
            _ => return None,
        })
    }

    /// Classifies a line of source code.
    ///
    /// Returns `None` for blank lines and lines holding only a comment. The
    /// result depends on nothing but `line`.
    pub fn classify(line: &str) -> Option<Self> {
        let line = strip_comment(line).trim();
        let first = line.split_whitespace().next()?;
        // truncate `port(` and `end;` but keep `);` whole
        let keyword = match first.find(|c: char| c == '(' || c == ';') {
            Some(i) if i > 0 && first.starts_with(')') == false => &first[..i],
            _ => first,
        };
        Some(Self::match_keyword(keyword).unwrap_or(Self::Continuation))
    }
}

/// Removes a trailing `--` comment from `line`.
///
/// A `--` that sits inside a double-quoted string literal is not a comment.
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'-' if in_string == false && bytes.get(i + 1) == Some(&b'-') => return &line[..i],
            _ => (),
        }
        i += 1;
    }
    line
}

/// Returns the text following the first opening parenthesis of `line`, if
/// the line has one.
///
/// Used on `generic (` and `port (` lines, which may already carry the first
/// declaration of their list.
pub fn after_open_paren(line: &str) -> Option<&str> {
    let line = strip_comment(line);
    line.find('(').map(|i| &line[i + 1..])
}
