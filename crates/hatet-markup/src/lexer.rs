//! Tag-head recognition and brace matching for AHT source.
//!
//! The scanner never tokenizes the whole block. It answers two questions
//! about a bounded span of the source: "does a tag head start here?" and
//! "where is the `}` matching this `{`?".

use crate::ast::Attributes;

// ── TagHead ───────────────────────────────────────────────────────────────

/// A recognized `@name(attrs) {` prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct TagHead {
    /// Byte offset of the `@`.
    pub start: usize,
    pub name: String,
    pub attributes: Attributes,
    /// Byte offset just past the opening `{`.
    pub body_start: usize,
}

// ── Scanner ───────────────────────────────────────────────────────────────

pub struct Scanner<'s> {
    src: &'s str,
    pos: usize,
    /// Exclusive upper bound; nothing at or past `end` belongs to the span.
    end: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(src: &'s str, pos: usize, end: usize) -> Self {
        Self { src, pos, end: end.min(src.len()) }
    }

    fn peek(&self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        self.src[self.pos..self.end].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    /// Try to read `'@' TagName AttrGroup? Ws* '{'` at the current position.
    ///
    /// Returns `None` when the text here is not a valid tag head; the caller
    /// then treats the `@` as literal text.
    pub fn tag_head(mut self) -> Option<TagHead> {
        let start = self.pos;
        if self.advance()? != '@' {
            return None;
        }

        let name_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        if self.pos == name_start {
            return None;
        }
        let name = self.src[name_start..self.pos].to_string();

        let attributes = if self.peek() == Some('(') {
            self.advance();
            let group_start = self.pos;
            let src = self.src;
            let (close, segments) = scan_group(&src[group_start..self.end]);
            let close = close?;
            let attrs = collect_attributes(segments, group_start);
            self.pos = group_start + close + 1; // past `)`
            attrs
        } else {
            Attributes::new()
        };

        self.skip_whitespace();
        if self.advance()? != '{' {
            return None;
        }

        Some(TagHead { start, name, attributes, body_start: self.pos })
    }
}

// ── Brace matching ────────────────────────────────────────────────────────

/// Find the `}` that balances the `{` ending just before `body_start`.
///
/// Depth starts at 1; every `{` increments and every `}` decrements. Returns
/// the offset of the `}` where depth returns to 0, or `None` if the span
/// ends first.
pub fn matching_brace(src: &str, body_start: usize, end: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, b) in src.as_bytes()[body_start..end].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body_start + i);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Attributes ────────────────────────────────────────────────────────────

/// Parse the inside of `( ... )`. `base` is the byte offset of `group` in the
/// block source, used for diagnostics only.
///
/// Segments without `=` or with an empty name are skipped.
pub fn parse_attributes(group: &str, base: usize) -> Attributes {
    collect_attributes(scan_group(group).1, base)
}

fn collect_attributes(segments: Vec<(usize, &str)>, base: usize) -> Attributes {
    let mut attrs = Attributes::new();
    for (offset, segment) in segments {
        if segment.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = segment.split_once('=') else {
            log::debug!("malformed attribute at offset {}: {:?}", base + offset, segment.trim());
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            log::debug!("malformed attribute at offset {}: empty name", base + offset);
            continue;
        }
        attrs.insert(name, unquote(value.trim()));
    }
    attrs
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GroupState {
    /// Before `=`.
    Name,
    /// After `=`, only whitespace seen so far.
    ValueStart,
    Quoted,
    Unquoted,
}

/// Walk an attribute group up to its closing `)`.
///
/// A `"` opens a quoted value only as the first non-blank character after
/// `=`; anywhere else it is an ordinary character. Inside a quoted value `,`
/// and `)` are literal. Returns the offset of the closing `)`, if any, and
/// the comma-separated segments before it with their offsets in `text`.
fn scan_group(text: &str) -> (Option<usize>, Vec<(usize, &str)>) {
    let mut segments = Vec::new();
    let mut state = GroupState::Name;
    let mut seg_start = 0;

    for (i, ch) in text.char_indices() {
        state = match (state, ch) {
            (GroupState::Quoted, '"') => GroupState::Unquoted,
            (GroupState::Quoted, _) => GroupState::Quoted,
            (_, ')') => {
                segments.push((seg_start, &text[seg_start..i]));
                return (Some(i), segments);
            }
            (_, ',') => {
                segments.push((seg_start, &text[seg_start..i]));
                seg_start = i + 1;
                GroupState::Name
            }
            (GroupState::Name, '=') => GroupState::ValueStart,
            (GroupState::Name, _) => GroupState::Name,
            (GroupState::ValueStart, '"') => GroupState::Quoted,
            (GroupState::ValueStart, c) if c.is_whitespace() => GroupState::ValueStart,
            (GroupState::ValueStart | GroupState::Unquoted, _) => GroupState::Unquoted,
        };
    }

    segments.push((seg_start, &text[seg_start..]));
    (None, segments)
}

/// Strip one layer of surrounding double quotes.
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
