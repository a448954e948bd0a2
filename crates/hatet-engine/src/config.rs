//! Run-time options: [`TranspileOptions`] for the driver and
//! [`LoggingConfig`] for the log backend.

pub use crate::logging::LoggingConfig;

/// Options for a [`Transpiler`](crate::driver::Transpiler) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileOptions {
    /// Reject AAAD blocks with unbalanced `!`/`@` directives instead of
    /// emitting them as-is. Off by default.
    pub strict_stylesheets: bool,
}

impl TranspileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_stylesheets(mut self, strict: bool) -> Self {
        self.strict_stylesheets = strict;
        self
    }
}
