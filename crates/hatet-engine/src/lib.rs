//! Hatet engine crate.
//!
//! Connects the AAAD and AHT compilers from `hatet-markup` to a document:
//! the [`host::Host`] trait is the seam, [`driver::Transpiler`] walks the
//! blocks, and [`document::SourceDocument`] is a ready-made host over plain
//! HTML-ish text.
//!
//! ```rust
//! use hatet_engine::{SourceDocument, Transpiler};
//!
//! let mut doc = SourceDocument::parse("<AHT>@p(class=lead){Hello}</AHT>");
//! let report = Transpiler::default().run(&mut doc);
//! assert!(report.is_clean());
//! assert_eq!(doc.render().unwrap(), r#"<p class="lead">Hello</p>"#);
//! ```

pub mod config;
pub mod document;
pub mod driver;
pub mod host;
pub mod html;
pub mod template;
pub mod vars;

pub mod logging;

pub use config::{LoggingConfig, TranspileOptions};
pub use document::SourceDocument;
pub use driver::{BlockFailure, Report, Transpiler};
pub use host::{Block, BlockKind, Host};
pub use template::TemplateValues;
pub use vars::StyleVars;
