/// A fatal error from compiling one AAAD or AHT block.
///
/// Errors never cross block boundaries: the caller decides what to do with
/// the failing block and keeps going with the rest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// An AHT tag whose `{` has no balancing `}` before the end of its span.
    /// `offset` is the byte offset of the tag's `@` in the block source.
    #[error("aht compile error at offset {offset}: '{{' of @{tag} is never closed")]
    UnbalancedTag { offset: usize, tag: String },

    /// Strict AAAD only: an `@` line with no open block.
    #[error("aaad compile error at line {line}: '@' closes no block")]
    StrayBlockClose { line: usize },

    /// Strict AAAD only: a `!selector` block still open when another block
    /// starts or the input ends. `line` is where the block was opened.
    #[error("aaad compile error at line {line}: block '{selector}' is never closed")]
    UnclosedBlock { line: usize, selector: String },
}

impl CompileError {
    pub(crate) fn unbalanced(offset: usize, tag: impl Into<String>) -> Self {
        Self::UnbalancedTag { offset, tag: tag.into() }
    }
}
