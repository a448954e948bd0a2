use hatet_markup::{CompileError, aaad, compile_aht};

use crate::config::TranspileOptions;
use crate::host::{BlockKind, Host};

// ── Report ────────────────────────────────────────────────────────────────

/// A block that failed to compile and was left in place.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFailure {
    pub kind: BlockKind,
    /// Position among the blocks of the same kind, in discovery order.
    pub index: usize,
    pub error: CompileError,
}

/// Outcome of one [`Transpiler::run`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Stylesheet blocks compiled and injected.
    pub stylesheets: usize,
    /// Markup blocks compiled and replaced.
    pub markup: usize,
    pub failures: Vec<BlockFailure>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, kind: BlockKind, index: usize, error: CompileError) {
        log::warn!("{} block #{} left untouched: {}", kind.tag_name(), index, error);
        self.failures.push(BlockFailure { kind, index, error });
    }
}

// ── Transpiler ────────────────────────────────────────────────────────────

/// Finds every block in a [`Host`], compiles it, and hands the result back.
///
/// Stylesheet blocks go first, then markup blocks. Each block is isolated: a
/// failing block is recorded in the [`Report`] and skipped, and its siblings
/// are still processed.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    options: TranspileOptions,
}

impl Transpiler {
    pub fn new(options: TranspileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    pub fn run<H: Host>(&self, host: &mut H) -> Report {
        let mut report = Report::default();

        for (index, block) in host.find_blocks(BlockKind::Stylesheet).into_iter().enumerate() {
            log::debug!("compiling AAAD block #{} ({} bytes)", index, block.source.len());
            match self.compile_stylesheet(&block.source) {
                Ok(css) => {
                    host.inject_stylesheet(css);
                    host.replace_subtree(&block.location, Vec::new());
                    report.stylesheets += 1;
                }
                Err(error) => report.fail(BlockKind::Stylesheet, index, error),
            }
        }

        for (index, block) in host.find_blocks(BlockKind::Markup).into_iter().enumerate() {
            log::debug!("compiling AHT block #{} ({} bytes)", index, block.source.len());
            match compile_aht(&block.source) {
                Ok(forest) => {
                    host.replace_subtree(&block.location, forest);
                    report.markup += 1;
                }
                Err(error) => report.fail(BlockKind::Markup, index, error),
            }
        }

        log::info!(
            "transpiled {} stylesheet and {} markup block(s), {} failed",
            report.stylesheets,
            report.markup,
            report.failures.len()
        );
        report
    }

    fn compile_stylesheet(&self, source: &str) -> Result<String, CompileError> {
        if self.options.strict_stylesheets {
            aaad::compile_strict(source)
        } else {
            Ok(aaad::compile(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Block;
    use hatet_markup::Node;

    /// Host that keeps blocks in a list and records every call.
    #[derive(Default)]
    struct MemoryHost {
        blocks: Vec<(BlockKind, String)>,
        stylesheets: Vec<String>,
        replaced: Vec<(usize, Vec<Node>)>,
    }

    impl MemoryHost {
        fn with(blocks: &[(BlockKind, &str)]) -> Self {
            Self {
                blocks: blocks.iter().map(|(k, s)| (*k, s.to_string())).collect(),
                ..Self::default()
            }
        }
    }

    impl Host for MemoryHost {
        type Location = usize;

        fn find_blocks(&self, kind: BlockKind) -> Vec<Block<usize>> {
            self.blocks
                .iter()
                .enumerate()
                .filter(|(_, (k, _))| *k == kind)
                .map(|(i, (k, s))| Block { kind: *k, source: s.clone(), location: i })
                .collect()
        }

        fn inject_stylesheet(&mut self, css: String) {
            self.stylesheets.push(css);
        }

        fn replace_subtree(&mut self, location: &usize, forest: Vec<Node>) {
            self.replaced.push((*location, forest));
        }
    }

    #[test]
    fn stylesheet_is_injected_and_block_removed() {
        let mut host = MemoryHost::with(&[(BlockKind::Stylesheet, "!div\ncolor red\n@")]);
        let report = Transpiler::default().run(&mut host);
        assert_eq!(report.stylesheets, 1);
        assert_eq!(host.stylesheets, vec!["div { color: red; }\n".to_string()]);
        assert_eq!(host.replaced, vec![(0, Vec::new())]);
    }

    #[test]
    fn failing_markup_block_is_isolated() {
        let mut host = MemoryHost::with(&[
            (BlockKind::Markup, "@div{unclosed"),
            (BlockKind::Markup, "@p{fine}"),
        ]);
        let report = Transpiler::default().run(&mut host);

        assert_eq!(report.markup, 1);
        assert_eq!(
            report.failures,
            vec![BlockFailure {
                kind: BlockKind::Markup,
                index: 0,
                error: CompileError::UnbalancedTag { offset: 0, tag: "div".into() },
            }]
        );
        assert_eq!(host.replaced.len(), 1);
        assert_eq!(host.replaced[0].0, 1);
    }

    #[test]
    fn lenient_stylesheets_never_fail() {
        let mut host = MemoryHost::with(&[(BlockKind::Stylesheet, "@\n!a")]);
        let report = Transpiler::default().run(&mut host);
        assert!(report.is_clean());
        assert_eq!(host.stylesheets, vec!["}\na { ".to_string()]);
    }

    #[test]
    fn strict_stylesheet_failure_leaves_block() {
        let mut host = MemoryHost::with(&[
            (BlockKind::Stylesheet, "@"),
            (BlockKind::Stylesheet, "!b\nmargin 0\n@"),
        ]);
        let report = Transpiler::new(TranspileOptions::new().strict_stylesheets(true)).run(&mut host);
        assert_eq!(report.stylesheets, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].error, CompileError::StrayBlockClose { line: 1 });
        assert_eq!(host.stylesheets, vec!["b { margin: 0; }\n".to_string()]);
        assert_eq!(host.replaced, vec![(1, Vec::new())]);
    }

    #[test]
    fn stylesheets_run_before_markup() {
        let mut host = MemoryHost::with(&[
            (BlockKind::Markup, "@a{x}"),
            (BlockKind::Stylesheet, "!a\ncolor red\n@"),
        ]);
        Transpiler::default().run(&mut host);
        let order: Vec<_> = host.replaced.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 0]);
    }
}
