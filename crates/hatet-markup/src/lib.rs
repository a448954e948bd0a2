//! Compilers for the two **Hatet** markup dialects.
//!
//! - **AAAD**, a line-oriented pseudo-CSS dialect that compiles to
//!   stylesheet text.
//! - **AHT**, a nested `@tag(attrs){ ... }` dialect that compiles to a
//!   forest of element and text nodes.
//!
//! Both compilers are pure functions over a single block of source text.
//! Finding blocks in a host document and putting the results back is the
//! job of `hatet-engine`.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Node`, `Element`, `Attributes`, `StyleBlock`, `Declaration` |
//! | [`error`] | `CompileError` |
//! | [`aaad`] | AAAD line compiler, strict variant, structured block view |
//! | [`lexer`] | AHT tag-head scanner and brace matching |
//! | [`parser`] | AHT `parse_str` entry point |
//! | [`serialize`] | `to_aht` |
//!
//! # Quick start
//!
//! ```rust
//! use hatet_markup::{compile_aaad, compile_aht, Node};
//!
//! let css = compile_aaad("!div\ncolor red\n@");
//! assert_eq!(css, "div { color: red; }\n");
//!
//! let forest = compile_aht(r#"@box(id="x"){@span{hi}}"#).unwrap();
//! let Node::Element(root) = &forest[0] else { panic!() };
//! assert_eq!(root.tag, "box");
//! assert_eq!(root.attr("id"), Some("x"));
//! ```

pub mod aaad;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serialize;

pub use aaad::compile as compile_aaad;
pub use ast::{Attributes, Declaration, Element, Node, StyleBlock};
pub use error::CompileError;
pub use parser::parse_str as compile_aht;
pub use serialize::to_aht;
