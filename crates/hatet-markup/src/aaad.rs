//! The AAAD line compiler.
//!
//! ```aaad
//! !div.card
//! color red
//! border 1px solid black
//! @
//! ```
//!
//! compiles to `div.card { color: red; border: 1px solid black; }\n`.
//!
//! Every line is classified on its own; there is no lookahead and no brace
//! balance tracking. A stray `@` still emits `}` and an unclosed `!` block
//! simply lacks its trailing `}`. [`compile_strict`] rejects both.

use crate::ast::{Declaration, StyleBlock};
use crate::error::CompileError;

// ── Line ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Line<'a> {
    /// `!selector`
    Open(&'a str),
    /// `@`
    Close,
    /// `property value...`
    Declaration { property: &'a str, value: String },
    /// Blank or single-token line; emits nothing.
    Ignored,
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if let Some(selector) = line.strip_prefix('!') {
        return Line::Open(selector.trim());
    }
    if line == "@" {
        return Line::Close;
    }
    if line.contains(' ') {
        let mut words = line.split_whitespace();
        if let Some(property) = words.next() {
            let value = words.collect::<Vec<_>>().join(" ");
            return Line::Declaration { property, value };
        }
    }
    Line::Ignored
}

fn emit(css: &mut String, line: &Line<'_>) {
    match line {
        Line::Open(selector) => {
            css.push_str(selector);
            css.push_str(" { ");
        }
        Line::Close => css.push_str("}\n"),
        Line::Declaration { property, value } => {
            css.push_str(property);
            css.push_str(": ");
            css.push_str(value);
            css.push_str("; ");
        }
        Line::Ignored => {}
    }
}

// ── Compilers ─────────────────────────────────────────────────────────────

/// Compile an AAAD block to CSS text. Never fails.
pub fn compile(source: &str) -> String {
    let mut css = String::new();
    for raw in source.lines() {
        emit(&mut css, &classify(raw));
    }
    css
}

/// Like [`compile`], but rejects unbalanced `!`/`@` directives.
pub fn compile_strict(source: &str) -> Result<String, CompileError> {
    let mut css = String::new();
    let mut open: Option<(usize, &str)> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = classify(raw);
        match &line {
            Line::Open(selector) => {
                if let Some((line, selector)) = open {
                    return Err(CompileError::UnclosedBlock { line, selector: selector.to_string() });
                }
                open = Some((line_no, *selector));
            }
            Line::Close => {
                if open.take().is_none() {
                    return Err(CompileError::StrayBlockClose { line: line_no });
                }
            }
            Line::Declaration { .. } | Line::Ignored => {}
        }
        emit(&mut css, &line);
    }

    match open {
        Some((line, selector)) => Err(CompileError::UnclosedBlock { line, selector: selector.to_string() }),
        None => Ok(css),
    }
}

/// Structured view of an AAAD block.
///
/// A block opens at `!selector` and closes at `@`, at the next `!`, or at
/// the end of input. Declarations outside a block, stray `@` lines, and `!`
/// lines with no selector are dropped.
pub fn style_blocks(source: &str) -> Vec<StyleBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<StyleBlock> = None;

    for raw in source.lines() {
        match classify(raw) {
            Line::Open(selector) => {
                blocks.extend(current.take());
                if !selector.is_empty() {
                    current = Some(StyleBlock { selector: selector.to_string(), declarations: Vec::new() });
                }
            }
            Line::Close => blocks.extend(current.take()),
            Line::Declaration { property, value } => {
                if let Some(block) = current.as_mut() {
                    block.declarations.push(Declaration { property: property.to_string(), value });
                }
            }
            Line::Ignored => {}
        }
    }
    blocks.extend(current);
    blocks
}
