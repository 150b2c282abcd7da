// @note: interface_declaration ::= [class] identifier_list : [ mode ] subtype_indication [ := static_expression ]
// @note: identifier_list ::= identifier { , identifier }

use serde_derive::Serialize;

/// A single entry of an entity's generic list.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Generic {
    name: String,
    #[serde(rename = "type")]
    datatype: String,
    default: Option<String>,
}

impl Generic {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> &str {
        &self.datatype
    }

    /// The value assigned with `:=`, if the declaration had one.
    pub fn get_default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// A single entry of an entity's port list.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Port {
    name: String,
    #[serde(rename = "mode")]
    direction: Option<String>,
    #[serde(rename = "type")]
    datatype: String,
    default: Option<String>,
}

impl Port {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// The mode token exactly as written (`in`, `OUT`, ...), if present.
    pub fn get_direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    pub fn get_type(&self) -> &str {
        &self.datatype
    }

    pub fn get_default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// One declaration statement that may name several identifiers sharing the
/// same mode, type, and default.
#[derive(Debug, PartialEq, Clone)]
pub struct InterfaceDeclaration {
    identifiers: Vec<String>,
    mode: Option<String>,
    datatype: String,
    expr: Option<String>,
}

/// Object class keywords allowed in front of an identifier list.
const CLASS_KEYWORDS: [&str; 4] = ["signal", "constant", "variable", "file"];

/// Port modes.
const MODE_KEYWORDS: [&str; 5] = ["in", "out", "inout", "buffer", "linkage"];

impl InterfaceDeclaration {
    /// Parses a statement `a, b : [mode] type [:= expr]` with its trailing
    /// `;` already removed.
    ///
    /// The mode is only looked for when `with_mode` is set (ports). Returns
    /// `None` when the text cannot be split into a name list and a type.
    pub fn from_statement(text: &str, with_mode: bool) -> Option<Self> {
        let colon = top_level_bytes(text)
            .into_iter()
            .find(|(i, c)| *c == b':' && text.as_bytes().get(i + 1) != Some(&b'='))?
            .0;
        let identifiers = Self::parse_identifier_list(&text[..colon])?;

        let mut rest = text[colon + 1..].trim_start();
        let mode = match with_mode {
            true => {
                let token = rest.split_whitespace().next().unwrap_or_default();
                if MODE_KEYWORDS.contains(&token.to_ascii_lowercase().as_str()) {
                    rest = rest[token.len()..].trim_start();
                    Some(token.to_string())
                } else {
                    None
                }
            }
            false => None,
        };

        let assign = top_level_bytes(rest)
            .into_iter()
            .find(|(i, c)| *c == b':' && rest.as_bytes().get(i + 1) == Some(&b'='))
            .map(|(i, _)| i);
        let (datatype, expr) = match assign {
            Some(i) => (rest[..i].trim(), Some(rest[i + 2..].trim())),
            None => (rest.trim(), None),
        };
        if datatype.is_empty() == true {
            return None;
        }
        Some(Self {
            identifiers: identifiers,
            mode: mode,
            datatype: datatype.to_string(),
            expr: expr.filter(|e| e.is_empty() == false).map(|e| e.to_string()),
        })
    }

    /// Splits the comma-separated names in front of the `:`.
    fn parse_identifier_list(text: &str) -> Option<Vec<String>> {
        let mut text = text.trim();
        // drop an optional object class keyword
        if let Some((first, rest)) = text.split_once(char::is_whitespace) {
            if CLASS_KEYWORDS.contains(&first.to_ascii_lowercase().as_str()) {
                text = rest.trim_start();
            }
        }
        let mut names = Vec::new();
        for part in text.split(',') {
            // keep only the first token of each name
            let name = part.split_whitespace().next()?;
            names.push(name.to_string());
        }
        Some(names)
    }

    pub fn get_identifiers(&self) -> &Vec<String> {
        &self.identifiers
    }

    /// Copies the shared type and default onto one generic per identifier.
    pub fn into_generics(self) -> Vec<Generic> {
        let Self {
            identifiers,
            datatype,
            expr,
            ..
        } = self;
        identifiers
            .into_iter()
            .map(|name| Generic {
                name: name,
                datatype: datatype.clone(),
                default: expr.clone(),
            })
            .collect()
    }

    /// Copies the shared mode, type, and default onto one port per identifier.
    pub fn into_ports(self) -> Vec<Port> {
        let Self {
            identifiers,
            mode,
            datatype,
            expr,
        } = self;
        identifiers
            .into_iter()
            .map(|name| Port {
                name: name,
                direction: mode.clone(),
                datatype: datatype.clone(),
                default: expr.clone(),
            })
            .collect()
    }
}

/// The declarations found on one line of a generic or port list.
#[derive(Debug, PartialEq)]
pub struct ListLine<'a> {
    /// Statements that parsed; malformed statements are left out.
    pub declarations: Vec<InterfaceDeclaration>,
    /// Text following the unmatched `)` that ended the list, if there was one.
    pub remainder: Option<&'a str>,
}

impl<'a> ListLine<'a> {
    /// Parses every `;`-separated statement of a line inside a list.
    pub fn parse(text: &'a str, with_mode: bool) -> Self {
        let (statements, remainder) = split_statements(text);
        Self {
            declarations: statements
                .into_iter()
                .filter_map(|s| InterfaceDeclaration::from_statement(s, with_mode))
                .collect(),
            remainder: remainder,
        }
    }

    /// Checks if the line ended the list with an unmatched `)`.
    pub fn closes_list(&self) -> bool {
        self.remainder.is_some()
    }
}

/// Splits `text` on top-level `;` characters. Stops at an unmatched `)` and
/// returns whatever follows it on the line.
///
/// Blank statements are dropped.
pub fn split_statements(text: &str) -> (Vec<&str>, Option<&str>) {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut end = text.len();
    let mut remainder = None;
    for (i, c) in top_level_bytes(text) {
        match c {
            b';' => {
                statements.push(&text[start..i]);
                start = i + 1;
            }
            b')' => {
                end = i;
                remainder = Some(&text[i + 1..]);
                break;
            }
            _ => (),
        }
    }
    statements.push(&text[start..end]);
    statements.retain(|s| s.trim().is_empty() == false);
    (statements, remainder)
}

/// Collects the byte offsets of every character outside parentheses, string
/// literals, and character literals.
///
/// An unmatched `)` is reported as a top-level character.
fn top_level_bytes(text: &str) -> Vec<(usize, u8)> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if in_string == true {
            if c == b'"' {
                in_string = false;
            }
        } else if c == b'"' {
            in_string = true;
        } else if c == b'\'' && bytes.get(i + 2) == Some(&b'\'') {
            // character literal such as '0' or ')'
            i += 3;
            continue;
        } else if c == b'(' {
            depth += 1;
        } else if c == b')' && depth > 0 {
            depth -= 1;
        } else if depth == 0 {
            result.push((i, c));
        }
        i += 1;
    }
    result
}
