//! Rendering documents back to text.

mod layout;

pub use layout::render_node;

use crate::model::{Document, Segment};

/// Render a document.
///
/// Opaque segments and unchanged parsed macros are emitted byte-for-byte;
/// changed and newly created macros use the canonical layout.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    for segment in doc.segments() {
        match segment {
            Segment::Opaque(text) => out.push_str(text),
            Segment::Macro(inv) => match inv.original_text() {
                Some(text) => out.push_str(text),
                None => out.push_str(&render_node(inv.node())),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_render_preserves_unmodified_source() {
        let source = "Elements_Subdir( Foo )\r\n# keep me\r\nfind_package(Boost   COMPONENTS system)\r\n";
        let doc = parse(source).unwrap();

        assert_eq!(render(&doc), source);
    }

    #[test]
    fn test_canonical_form_is_a_fixed_point() {
        let source = "elements_subdir(Foo)\nelements_add_library(Foo a.cpp b.cpp LINK_LIBRARIES X)\n";
        let mut doc = parse(source).unwrap();
        doc.canonicalize();

        let once = render(&doc);
        let twice = render(&parse(&once).unwrap());

        assert_eq!(once, twice);
        assert_ne!(once, source);
    }
}
