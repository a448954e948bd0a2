use crate::ast::{Attributes, Element, Node};
use crate::error::CompileError;
use crate::lexer::{Scanner, matching_brace};

// ── Open tags ─────────────────────────────────────────────────────────────

/// An element whose head has been read but whose `}` has not been reached.
struct OpenTag {
    name: String,
    attributes: Attributes,
    children: Vec<Node>,
    /// Offset of the matching `}`, resolved when the tag is opened.
    close: usize,
}

impl OpenTag {
    fn finish(self) -> Element {
        Element { tag: self.name, attributes: self.attributes, children: self.children }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

/// Recursive-descent AHT parser.
///
/// Nesting is tracked on an explicit stack of open tags (most recently opened
/// last) instead of the call stack, so arbitrarily deep input cannot overflow.
/// Each element is fully built before it is attached to its parent.
pub struct Parser<'s> {
    src: &'s str,
    pos: usize,
    /// Start of the pending text run at the current nesting level.
    text_start: usize,
    open: Vec<OpenTag>,
    forest: Vec<Node>,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, text_start: 0, open: Vec::new(), forest: Vec::new() }
    }

    /// End of the span the cursor is currently inside.
    fn span_end(&self) -> usize {
        self.open.last().map(|t| t.close).unwrap_or(self.src.len())
    }

    fn siblings(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(tag) => &mut tag.children,
            None => &mut self.forest,
        }
    }

    /// Emit the raw text between `text_start` and `pos` as a sibling.
    fn flush_text(&mut self) {
        if self.text_start < self.pos {
            let text = self.src[self.text_start..self.pos].to_string();
            self.siblings().push(Node::Text(text));
        }
    }

    pub fn parse_document(mut self) -> Result<Vec<Node>, CompileError> {
        loop {
            let end = self.span_end();

            if self.pos >= end {
                self.flush_text();
                match self.open.pop() {
                    Some(tag) => {
                        // `pos` sits on the closing `}`.
                        self.pos = tag.close + 1;
                        self.text_start = self.pos;
                        let element = tag.finish();
                        self.siblings().push(Node::Element(element));
                    }
                    None => break,
                }
                continue;
            }

            let rest = &self.src[self.pos..end];
            let Some(at) = rest.find('@') else {
                self.pos = end;
                continue;
            };
            self.pos += at;

            match Scanner::new(self.src, self.pos, end).tag_head() {
                Some(head) => {
                    let close = matching_brace(self.src, head.body_start, end)
                        .ok_or_else(|| CompileError::unbalanced(head.start, &head.name))?;
                    self.flush_text();
                    log::trace!("open @{} at {}", head.name, head.start);
                    self.open.push(OpenTag {
                        name: head.name,
                        attributes: head.attributes,
                        children: Vec::new(),
                        close,
                    });
                    self.pos = head.body_start;
                    self.text_start = self.pos;
                }
                // Literal `@`: keep it in the text run and scan on.
                None => self.pos += 1,
            }
        }

        Ok(self.forest)
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Compile an AHT block into its top-level forest.
pub fn parse_str(src: &str) -> Result<Vec<Node>, CompileError> {
    Parser::new(src).parse_document()
}
