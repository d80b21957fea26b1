//! Case-preserving term substitution over HTML documents.
//!
//! - [`tree`]: html5ever-backed document tree with typed node kinds
//! - [`substitution`]: whole-word matcher and casing rules
//! - [`rewriter`]: body/title passes and serialization
//!
//! The whole crate is synchronous and does no I/O. Every entry point is
//! total: any string, HTML or not, produces a [`RewriteResult`].
//!
//! ```rust
//! use faleproxy_rewrite::{Substitution, rewrite_html};
//!
//! let sub = Substitution::new("Yale", "Fale").unwrap();
//! let out = rewrite_html(
//!     r#"<title>Yale University Test Page</title><body><a href="https://www.yale.edu/about">About Yale</a></body>"#,
//!     &sub,
//! );
//! assert_eq!(out.title, "Fale University Test Page");
//! assert!(out.html.contains(r#"<a href="https://www.yale.edu/about">About Fale</a>"#));
//! ```

pub mod rewriter;
pub mod substitution;
pub mod tree;

pub use rewriter::{RewriteResult, rewrite, rewrite_document, rewrite_html};
pub use substitution::{CaseClass, Substitution, SubstitutionError};
pub use tree::{DocumentTree, NodeKind};
