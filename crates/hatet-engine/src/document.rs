//! An in-memory text document that hosts `<AAAD>` and `<AHT>` blocks.
//!
//! ```html
//! <html><head></head><body>
//! <AAAD>
//! !h1
//! color teal
//! @
//! </AAAD>
//! <AHT>@h1{Hello} @p(class=lead){from Hatet}</AHT>
//! </body></html>
//! ```
//!
//! Everything outside the blocks is kept byte for byte.

use std::cell::RefCell;
use std::io;

use hatet_markup::Node;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{BufferQueue, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts};

use crate::host::{Block, BlockKind, Host};
use crate::html::render_forest;

/// Location of a block inside a [`SourceDocument`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlockId(usize);

// ── Segments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Segment {
    Raw(String),
    Block(BlockSlot),
}

#[derive(Debug, Clone)]
struct BlockSlot {
    kind: BlockKind,
    /// The whole element, tags included, as it appeared in the input.
    raw: String,
    /// Text content of the element, entities decoded.
    source: String,
    /// Set once the block has been compiled.
    replacement: Option<Vec<Node>>,
}

// ── SourceDocument ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    segments: Vec<Segment>,
    stylesheets: Vec<String>,
}

impl SourceDocument {
    /// Split `text` into plain segments and dialect blocks.
    ///
    /// Tag names match ASCII case-insensitively and the opening tag may carry
    /// attributes. An opening tag with no closing tag stays plain text.
    pub fn parse(text: &str) -> Self {
        // ASCII lowercasing keeps byte offsets intact.
        let lower = text.to_ascii_lowercase();
        let mut segments = Vec::new();
        let mut plain_start = 0;
        let mut pos = 0;

        while let Some(at) = lower[pos..].find('<').map(|i| pos + i) {
            let Some((kind, content_start)) = open_tag(&lower, at) else {
                pos = at + 1;
                continue;
            };

            let close = format!("</{}>", kind.tag_name().to_ascii_lowercase());
            let Some(content_end) = lower[content_start..].find(&close).map(|i| content_start + i) else {
                log::warn!("<{}> at byte {} has no closing tag; kept as text", kind.tag_name(), at);
                pos = at + 1;
                continue;
            };
            let block_end = content_end + close.len();

            if plain_start < at {
                segments.push(Segment::Raw(text[plain_start..at].to_string()));
            }
            segments.push(Segment::Block(BlockSlot {
                kind,
                raw: text[at..block_end].to_string(),
                source: text_content(&text[content_start..content_end]),
                replacement: None,
            }));
            plain_start = block_end;
            pos = block_end;
        }

        if plain_start < text.len() {
            segments.push(Segment::Raw(text[plain_start..].to_string()));
        }

        Self { segments, stylesheets: Vec::new() }
    }

    /// Number of blocks of either kind, compiled or not.
    pub fn block_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Block(_))).count()
    }

    /// Stylesheet text injected so far, in injection order.
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Compiled forests of replaced blocks, in document order.
    pub fn forests_mut(&mut self) -> impl Iterator<Item = &mut Vec<Node>> {
        self.segments.iter_mut().filter_map(|seg| match seg {
            Segment::Block(slot) => slot.replacement.as_mut(),
            Segment::Raw(_) => None,
        })
    }

    /// Write the document back out.
    ///
    /// Replaced blocks render as HTML, blocks that were never replaced keep
    /// their original text. Injected stylesheets become `<style>` elements
    /// at the end of `<head>`, or at the very start without one. A `</`
    /// inside injected CSS is written as `<\/` so it cannot end the element.
    pub fn render(&self) -> io::Result<String> {
        let mut body = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Raw(s) => body.push_str(s),
                Segment::Block(slot) => match &slot.replacement {
                    Some(forest) => body.push_str(&render_forest(forest)?),
                    None => body.push_str(&slot.raw),
                },
            }
        }

        if self.stylesheets.is_empty() {
            return Ok(body);
        }

        let styles: String = self
            .stylesheets
            .iter()
            .map(|css| format!("<style>{}</style>\n", css.replace("</", "<\\/")))
            .collect();
        Ok(match body.to_ascii_lowercase().find("</head>") {
            Some(at) => {
                body.insert_str(at, &styles);
                body
            }
            None => styles + &body,
        })
    }
}

impl Host for SourceDocument {
    type Location = BlockId;

    fn find_blocks(&self, kind: BlockKind) -> Vec<Block<BlockId>> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, seg)| match seg {
                Segment::Block(slot) if slot.kind == kind && slot.replacement.is_none() => {
                    Some(Block { kind, source: slot.source.clone(), location: BlockId(i) })
                }
                _ => None,
            })
            .collect()
    }

    fn inject_stylesheet(&mut self, css: String) {
        self.stylesheets.push(css);
    }

    fn replace_subtree(&mut self, location: &BlockId, forest: Vec<Node>) {
        match self.segments.get_mut(location.0) {
            Some(Segment::Block(slot)) => slot.replacement = Some(forest),
            _ => log::warn!("no block at {:?}; replacement dropped", location),
        }
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

/// If an `<AAAD ...>` or `<AHT ...>` opening tag starts at `at`, return its
/// kind and the offset just past its `>`.
fn open_tag(lower: &str, at: usize) -> Option<(BlockKind, usize)> {
    let rest = &lower[at + 1..];
    let name_len = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
    let kind = match &rest[..name_len] {
        "aaad" => BlockKind::Stylesheet,
        "aht" => BlockKind::Markup,
        _ => return None,
    };
    let after = &rest[name_len..];
    if !(after.starts_with('>') || after.starts_with(|c: char| c.is_ascii_whitespace())) {
        return None;
    }
    let gt = after.find('>')?;
    Some((kind, at + 1 + name_len + gt + 1))
}

/// Collects character tokens and drops everything else.
#[derive(Default)]
struct TextSink {
    text: RefCell<String>,
}

impl TokenSink for TextSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(t) => self.text.borrow_mut().push_str(&t),
            Token::NullCharacterToken => self.text.borrow_mut().push('\0'),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Text content of a block body: character references resolved the way an
/// HTML parser resolves them, stray markup dropped.
fn text_content(s: &str) -> String {
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(s));

    let tokenizer = Tokenizer::new(TextSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&input);
    tokenizer.end();
    tokenizer.sink.text.take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Transpiler;

    #[test]
    fn finds_blocks_case_insensitively() {
        let doc = SourceDocument::parse("<aaad>!a\n@</aaad> mid <AHT class=\"x\">@p{y}</Aht>");
        assert_eq!(doc.block_count(), 2);
        let css = doc.find_blocks(BlockKind::Stylesheet);
        assert_eq!(css[0].source, "!a\n@");
        let markup = doc.find_blocks(BlockKind::Markup);
        assert_eq!(markup[0].source, "@p{y}");
    }

    #[test]
    fn other_tags_are_plain_text() {
        let text = "<p>hi</p><ahtx>no</ahtx><a href=x>y</a>";
        let doc = SourceDocument::parse(text);
        assert_eq!(doc.block_count(), 0);
        assert_eq!(doc.render().unwrap(), text);
    }

    #[test]
    fn unclosed_block_tag_is_plain_text() {
        let doc = SourceDocument::parse("a <AHT>@p{x} b");
        assert_eq!(doc.block_count(), 0);
        assert_eq!(doc.render().unwrap(), "a <AHT>@p{x} b");
    }

    #[test]
    fn entities_are_decoded_in_sources() {
        let doc = SourceDocument::parse("<AHT>@a(title=\"x &amp; y\"){1 &lt; 2}</AHT>");
        assert_eq!(doc.find_blocks(BlockKind::Markup)[0].source, "@a(title=\"x & y\"){1 < 2}");
    }

    #[test]
    fn numeric_and_named_references_are_decoded() {
        let doc = SourceDocument::parse("<AHT>&#64;p{x} &lbrace; &nbsp;</AHT>");
        assert_eq!(doc.find_blocks(BlockKind::Markup)[0].source, "@p{x} { \u{a0}");
    }

    #[test]
    fn hex_reference_compiles_to_a_tag() {
        let mut doc = SourceDocument::parse("<AHT>&#x40;em{hi}</AHT>");
        assert!(Transpiler::default().run(&mut doc).is_clean());
        assert_eq!(doc.render().unwrap(), "<em>hi</em>");
    }

    #[test]
    fn injected_css_cannot_close_style_element() {
        let mut doc = SourceDocument::parse("<head></head>");
        doc.inject_stylesheet("a { content: \"</style><script>\"; }".into());
        let out = doc.render().unwrap();
        assert_eq!(out.matches("</style>").count(), 1);
        assert!(out.contains("<\\/style><script>"));
    }

    #[test]
    fn renders_full_document() {
        let text = "<html><head><title>t</title></head><body>\
                    <AAAD>\n!h1\ncolor teal\n@\n</AAAD>\
                    <AHT>@h1{Hello} @p(class=lead){there}</AHT>\
                    </body></html>";
        let mut doc = SourceDocument::parse(text);
        let report = Transpiler::default().run(&mut doc);
        assert!(report.is_clean());
        assert_eq!(
            doc.render().unwrap(),
            "<html><head><title>t</title><style>h1 { color: teal; }\n</style>\n</head><body>\
             <h1>Hello</h1> <p class=\"lead\">there</p>\
             </body></html>"
        );
    }

    #[test]
    fn styles_go_first_without_head() {
        let mut doc = SourceDocument::parse("<AAAD>!a\nmargin 0\n@</AAAD><AHT>@a{x}</AHT>");
        Transpiler::default().run(&mut doc);
        assert_eq!(doc.render().unwrap(), "<style>a { margin: 0; }\n</style>\n<a>x</a>");
    }

    #[test]
    fn failed_block_stays_visible() {
        let text = "<AHT>@div{unclosed</AHT>|<AHT>@b{ok}</AHT>";
        let mut doc = SourceDocument::parse(text);
        let report = Transpiler::default().run(&mut doc);

        assert_eq!(report.markup, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            hatet_markup::CompileError::UnbalancedTag { .. }
        ));
        assert_eq!(doc.render().unwrap(), "<AHT>@div{unclosed</AHT>|<b>ok</b>");
    }

    #[test]
    fn second_run_finds_only_failed_blocks() {
        let mut doc = SourceDocument::parse("<AHT>@a{</AHT><AHT>@b{x}</AHT>");
        Transpiler::default().run(&mut doc);
        let left = doc.find_blocks(BlockKind::Markup);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].source, "@a{");
    }

    #[test]
    fn forests_are_editable_after_run() {
        let mut doc = SourceDocument::parse("<AHT>@p{x}</AHT>");
        Transpiler::default().run(&mut doc);
        for forest in doc.forests_mut() {
            forest.push(Node::text("!"));
        }
        assert_eq!(doc.render().unwrap(), "<p>x</p>!");
    }
}
