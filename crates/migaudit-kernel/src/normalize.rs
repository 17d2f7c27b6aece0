//! Value normalizers.
//!
//! Convert heterogeneous cell text into canonical shapes before comparison.
//! Nothing here returns an error to its caller: malformed input is logged and
//! reported as absent, and the comparator decides what absence means.

use crate::cell::Cell;
use tracing::{debug, error};

/// Why a cell could not be read as a literal list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListParseError {
    #[error("expected `[` at offset {0}")]
    ExpectedOpen(usize),

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("unexpected token `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("expected `,` or `]` at offset {0}")]
    ExpectedSeparator(usize),

    #[error("trailing input after `]` at offset {0}")]
    TrailingInput(usize),
}

/// True for the missing sentinel.
pub fn is_missing(cell: &Cell) -> bool {
    cell.is_missing()
}

/// Read a literal list rendering such as `['a', "b"]` into its strings.
///
/// Missing and empty cells are the empty list. Malformed text is logged and
/// returns `None`.
pub fn parse_stringified_list(cell: &Cell) -> Option<Vec<String>> {
    let Some(text) = cell.as_text() else {
        return Some(Vec::new());
    };
    if text.is_empty() {
        return Some(Vec::new());
    }
    match parse_literal_list(text) {
        Ok(items) => {
            debug!(input = text, items = items.len(), "parsed stringified list");
            Some(items)
        }
        Err(error) => {
            error!(input = text, %error, "malformed stringified list");
            None
        }
    }
}

/// Render strings the way the exporters render a list cell: `['a', 'b']`.
pub fn render_stringified_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_quoted(&mut out, item.as_ref());
    }
    out.push(']');
    out
}

/// Read a JSON array of slash-delimited paths, keeping each path's second
/// segment (its immediate parent identifier).
///
/// `["community/collection"]` becomes `["collection"]`. Non-text cells and
/// malformed JSON are the empty list.
pub fn parse_nested_path_list(cell: &Cell) -> Vec<String> {
    let Some(text) = cell.as_text() else {
        return Vec::new();
    };
    if text.trim().is_empty() {
        return Vec::new();
    }
    let paths: Vec<String> = match serde_json::from_str(text) {
        Ok(paths) => paths,
        Err(error) => {
            error!(input = text, %error, "malformed path list");
            return Vec::new();
        }
    };
    let parents: Vec<String> = paths
        .iter()
        .filter_map(|path| {
            let parent = path.split('/').nth(1).filter(|segment| !segment.is_empty());
            if parent.is_none() {
                debug!(path = path.as_str(), "path has no parent segment");
            }
            parent.map(str::to_string)
        })
        .collect();
    debug!(input = text, parents = ?parents, "reduced path list");
    parents
}

/// Remove every whitespace character, for formatting-insensitive equality.
///
/// Unlike trimming, interior runs go too: `"a b\n"` becomes `"ab"`.
pub fn strip_whitespace_collapse(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Read a cell that may hold either a scalar or a stringified list.
///
/// Blank cells are the empty list, text starting with `[` is parsed as a
/// list, anything else is a one-element list of the trimmed text.
pub fn cell_as_list(cell: &Cell) -> Option<Vec<String>> {
    let Some(text) = cell.as_text() else {
        return Some(Vec::new());
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Some(Vec::new())
    } else if trimmed.starts_with('[') {
        parse_stringified_list(cell)
    } else {
        Some(vec![trimmed.to_string()])
    }
}

/// Trim every element.
pub fn trim_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .collect()
}

fn push_quoted(out: &mut String, value: &str) {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn parse_literal_list(input: &str) -> Result<Vec<String>, ListParseError> {
    let mut parser = LiteralListParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    parser.parse()
}

struct LiteralListParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralListParser {
    fn parse(&mut self) -> Result<Vec<String>, ListParseError> {
        self.skip_ws();
        if self.peek() != Some('[') {
            return Err(ListParseError::ExpectedOpen(self.pos));
        }
        self.pos += 1;

        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return self.finish(items);
        }

        loop {
            self.skip_ws();
            items.push(self.element()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == Some(']') {
                        self.pos += 1;
                        return self.finish(items);
                    }
                }
                Some(']') => {
                    self.pos += 1;
                    return self.finish(items);
                }
                _ => return Err(ListParseError::ExpectedSeparator(self.pos)),
            }
        }
    }

    fn finish(&mut self, items: Vec<String>) -> Result<Vec<String>, ListParseError> {
        self.skip_ws();
        if self.pos < self.chars.len() {
            return Err(ListParseError::TrailingInput(self.pos));
        }
        Ok(items)
    }

    fn element(&mut self) -> Result<String, ListParseError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => self.string(quote),
            _ => self.bare_number(),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, ListParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(ListParseError::UnterminatedString(start));
            };
            self.pos += 1;
            match c {
                '\\' => value.push(self.escape()?),
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, ListParseError> {
        let at = self.pos;
        let Some(c) = self.peek() else {
            return Err(ListParseError::InvalidEscape(at));
        };
        self.pos += 1;
        let decoded = match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            '\\' | '\'' | '"' => c,
            'x' => self.hex_escape(2, at)?,
            'u' => self.hex_escape(4, at)?,
            'U' => self.hex_escape(8, at)?,
            _ => return Err(ListParseError::InvalidEscape(at)),
        };
        Ok(decoded)
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char, ListParseError> {
        let end = self.pos + digits;
        if end > self.chars.len() {
            return Err(ListParseError::InvalidEscape(at));
        }
        let hex: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or(ListParseError::InvalidEscape(at))
    }

    fn bare_number(&mut self) -> Result<String, ListParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || c == ']' || c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        if !token.is_empty() && token.parse::<f64>().is_ok() {
            Ok(token)
        } else {
            Err(ListParseError::UnexpectedToken {
                token,
                offset: start,
            })
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}
