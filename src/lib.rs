//! High performance XML re-indenter.
//!
//! `xml-indent` rewrites the indentation of XML documents according to
//! element nesting without building a DOM. A streaming [`Tokenizer`] walks
//! an immutable byte buffer and a [`Formatter`] consumes its tokens,
//! emitting bytes to an output sink. Output is byte-stable across runs.
//!
//! Two disciplines are supported:
//!
//! - **pretty**: whitespace between tags is fully reshaped, every element
//!   gets its own line (mixed content stays glued together);
//! - **indent-only**: the author's line breaks are kept exactly as they
//!   are and only the leading whitespace of each line is rewritten.
//!
//! `xml:space="preserve"` scopes suspend formatting entirely and pass
//! through verbatim. Malformed input never fails: unterminated constructs
//! extend to the end of the buffer and mismatched tags are emitted as they
//! came.
//!
//! # Examples
//!
//! ```
//! use xml_indent::FormatterBuilder;
//!
//! let xml = b"<config><db><host>h</host></db></config>";
//! let mut formatter = FormatterBuilder::new()
//!     .indent_chars("  ")
//!     .into_formatter(xml, Vec::new());
//! formatter.pretty_print().unwrap();
//! assert_eq!(
//!     String::from_utf8(formatter.into_inner()).unwrap(),
//!     "<config>\n  <db>\n    <host>h</host>\n  </db>\n</config>\n"
//! );
//! ```
//!
//! Whole-file formatting, including the cosmetic post passes (comment
//! normalization, the space before `/>`, CRLF line endings), lives in
//! [`bulk`]:
//!
//! ```
//! use xml_indent::bulk::format_bytes;
//! use xml_indent::FormatParams;
//!
//! let out = format_bytes(b"<a>text</a>", &FormatParams::default()).unwrap();
//! assert_eq!(out, b"<a>text</a>\r\n");
//! ```
//!
//! ## Features
//!
#![cfg_attr(
    feature = "document-features",
    cfg_attr(doc, doc = ::document_features::document_features!())
)]

pub mod bulk;
pub mod errors;
pub mod formatter;
pub mod path;
pub mod post;
pub mod tokenizer;
pub mod tokens;
#[cfg(test)]
pub(crate) mod utils;

pub use crate::errors::{Error, Result};
pub use crate::formatter::{FormatParams, Formatter, FormatterBuilder};
pub use crate::path::PathMode;
pub use crate::tokenizer::{PreserveStack, Tokenizer};
pub use crate::tokens::{ParseContext, Token, TokenKind, TokenSet};
