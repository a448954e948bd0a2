use hatet_markup::Node;

// ── BlockKind ─────────────────────────────────────────────────────────────

/// Which dialect a block is written in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlockKind {
    /// AAAD, compiled to stylesheet text.
    Stylesheet,
    /// AHT, compiled to an element forest.
    Markup,
}

impl BlockKind {
    /// Element name that marks this kind of block in a host document.
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockKind::Stylesheet => "AAAD",
            BlockKind::Markup => "AHT",
        }
    }
}

// ── Block ─────────────────────────────────────────────────────────────────

/// One discovered block: its raw source and where it lives in the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<L> {
    pub kind: BlockKind,
    pub source: String,
    pub location: L,
}

// ── Host ──────────────────────────────────────────────────────────────────

/// A document that holds markup blocks and accepts compiled artifacts.
///
/// The driver only ever talks to the document through this trait.
pub trait Host {
    /// Opaque handle identifying a block's position in the document.
    type Location;

    /// All blocks of `kind` still waiting to be compiled, in document order.
    fn find_blocks(&self, kind: BlockKind) -> Vec<Block<Self::Location>>;

    /// Add compiled stylesheet text to the document.
    fn inject_stylesheet(&mut self, css: String);

    /// Replace the block at `location` with `forest`. An empty forest removes
    /// the block.
    fn replace_subtree(&mut self, location: &Self::Location, forest: Vec<Node>);
}
