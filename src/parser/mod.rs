//! Parser for Elements CMakeLists files.
//!
//! The parser locates command invocations with a single-pass scanner that
//! tracks parenthesis depth, quoted arguments, bracket arguments and
//! comments. Commands listed in [`crate::grammar`] become typed macro nodes;
//! everything else is kept as opaque text.
//!
//! # Usage
//!
//! ```ignore
//! use elements_cmake::parser::parse;
//!
//! let source = std::fs::read_to_string("CMakeLists.txt")?;
//! let document = parse(&source)?;
//!
//! for node in document.nodes() {
//!     println!("{}({})", node.kind(), node.name());
//! }
//! ```

mod document;
pub mod scanner;
pub mod span;

pub use document::parse;
pub use span::{Location, Span};
