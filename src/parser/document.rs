//! Splitting a CMakeLists file into opaque text and recognized macros.

use miette::NamedSource;

use crate::error::{CmakeError, Result};
use crate::grammar;
use crate::model::{Document, Invocation, MacroNode, Segment};

use super::scanner::{Scanner, Unclosed};
use super::span::{offset_to_location, Span};

/// Parse a CMakeLists file into a [`Document`].
///
/// Unrecognized commands, and recognized ones whose arguments do not fit the
/// expected shape, become opaque text. The only error is an unbalanced
/// delimiter inside a recognized command.
pub fn parse(source: &str) -> Result<Document> {
    let mut scanner = Scanner::new(source);
    let mut segments = Vec::new();
    let mut opaque_start = 0;

    while let Some(command) = scanner.next_command() {
        let schema = grammar::lookup(command.name);
        let close = match (scanner.matching_paren(command.open_paren), schema) {
            (Ok(close), _) => close,
            (Err(unclosed), Some(_)) => {
                return Err(syntax_error(source, command.name, unclosed));
            }
            // The rest of the file belongs to an unterminated foreign command.
            (Err(_), None) => break,
        };
        scanner.seek(close + 1);

        let Some(schema) = schema else {
            continue;
        };
        let node = scanner
            .tokenize(command.open_paren + 1, close)
            .and_then(|tokens| schema.classify(&tokens))
            .and_then(|args| MacroNode::from_arguments(schema.kind, args));
        let Some(node) = node else {
            continue;
        };

        if opaque_start < command.start {
            segments.push(Segment::Opaque(source[opaque_start..command.start].to_string()));
        }
        let end = close + 1;
        segments.push(Segment::Macro(Invocation::parsed(
            node,
            &source[command.start..end],
            Span::from_offsets(source, command.start, end),
        )));
        opaque_start = end;
    }

    if opaque_start < source.len() {
        segments.push(Segment::Opaque(source[opaque_start..].to_string()));
    }

    Ok(Document::from_segments(segments))
}

fn syntax_error(source: &str, macro_name: &str, unclosed: Unclosed) -> CmakeError {
    CmakeError::Syntax {
        macro_name: macro_name.to_string(),
        message: unclosed.delimiter.describe().to_string(),
        offset: unclosed.offset,
        location: offset_to_location(source, unclosed.offset),
        src: NamedSource::new("CMakeLists.txt", source.to_string()),
        span: (unclosed.offset, 1).into(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::{InstallFlag, MacroKind};
    use crate::render::render;

    const MODULE: &str = r#"CMAKE_MINIMUM_REQUIRED(VERSION 2.8.5)

#===============================================================================
# Load elements_subdir macro here
# Examples:
#   For declaring a project module:
#         elements_subdir(ElementsExamples)
#===============================================================================
elements_subdir(ElementsExamples)

elements_depends_on_subdirs(ElementsKernel)

find_package(Boost COMPONENTS program_options filesystem)

include_directories(${CMAKE_CURRENT_SOURCE_DIR}/include)

elements_add_library(ElementsExamples src/lib/*.cpp
                     LINK_LIBRARIES ElementsKernel
                     INCLUDE_DIRS ElementsKernel
                     PUBLIC_HEADERS ElementsExamples)

elements_add_executable(CppProgramExample src/program/CppProgramExample.cpp
                        LINK_LIBRARIES ElementsExamples)

if(CPPUNIT_FOUND)
  elements_add_unit_test(CppUnitExample tests/src/CppUnit/*.cpp
                         LINK_LIBRARIES ElementsExamples TYPE CppUnit)
endif()

elements_add_python_program(PythonProgramExample ElementsExamples.PythonProgramExample)

elements_install_python_modules()
elements_install_conf_files()
"#;

    fn kinds(doc: &Document) -> Vec<MacroKind> {
        doc.nodes().map(MacroNode::kind).collect()
    }

    #[test]
    fn test_parse_module_file() {
        let doc = parse(MODULE).unwrap();

        assert_eq!(
            kinds(&doc),
            vec![
                MacroKind::Subdir,
                MacroKind::ModuleDependency,
                MacroKind::Package,
                MacroKind::Library,
                MacroKind::Executable,
                MacroKind::UnitTest,
                MacroKind::PythonExecutable,
                MacroKind::InstallFlag(InstallFlag::PythonModules),
                MacroKind::InstallFlag(InstallFlag::ConfFiles),
            ]
        );
        assert_eq!(doc.module_name(), Some("ElementsExamples"));
        assert_eq!(render(&doc), MODULE);
    }

    #[test]
    fn test_parse_library_fields() {
        let doc = parse(MODULE).unwrap();

        let Some(MacroNode::Library(lib)) = doc.find_by_name(MacroKind::Library, "ElementsExamples")
        else {
            panic!("library not found");
        };
        assert_eq!(lib.sources.as_slice(), ["src/lib/*.cpp"]);
        assert_eq!(lib.link_libraries.as_slice(), ["ElementsKernel"]);
        assert_eq!(lib.include_dirs.as_slice(), ["ElementsKernel"]);
        assert_eq!(lib.public_headers.as_slice(), ["ElementsExamples"]);
    }

    #[test]
    fn test_parse_unit_test_inside_if_block() {
        let doc = parse(MODULE).unwrap();

        let Some(MacroNode::UnitTest(test)) = doc.find_by_name(MacroKind::UnitTest, "CppUnitExample")
        else {
            panic!("unit test not found");
        };
        assert_eq!(test.framework.as_deref(), Some("CppUnit"));
        assert_eq!(test.link_libraries.as_slice(), ["ElementsExamples"]);
    }

    #[test]
    fn test_text_without_macros_is_one_opaque_segment() {
        let source = "# comment\n\nproject(Foo)\nset(X \"a b\")\n";
        let doc = parse(source).unwrap();

        assert_eq!(doc.segments().len(), 1);
        assert!(matches!(&doc.segments()[0], Segment::Opaque(text) if text == source));
    }

    #[test]
    fn test_empty_source() {
        let doc = parse("").unwrap();
        assert!(doc.segments().is_empty());
        assert_eq!(render(&doc), "");
    }

    #[test]
    fn test_wrong_shape_is_opaque() {
        let source = "elements_subdir()\nelements_subdir(A B)\nelements_install_scripts(now)\nelements_add_library(Foo $<IF:(x)>)\n";
        let doc = parse(source).unwrap();

        assert_eq!(doc.nodes().count(), 0);
        assert_eq!(render(&doc), source);
    }

    #[test]
    fn test_unbalanced_recognized_macro_is_fatal() {
        let source = "elements_subdir(Foo)\nelements_add_library(Foo src/lib/*.cpp\n";

        let err = parse(source).unwrap_err();
        match err {
            CmakeError::Syntax {
                macro_name,
                offset,
                location,
                ..
            } => {
                assert_eq!(macro_name, "elements_add_library");
                assert_eq!(offset, 41);
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_quote_is_fatal() {
        let source = "elements_add_library(Foo \"src/lib/a.cpp)\n";

        assert!(matches!(parse(source), Err(CmakeError::Syntax { offset: 25, .. })));
    }

    #[test]
    fn test_unbalanced_foreign_macro_is_opaque() {
        let source = "message(STATUS \"oops)\nelements_subdir(Foo)\n";
        let doc = parse(source).unwrap();

        assert_eq!(doc.nodes().count(), 0);
        assert_eq!(render(&doc), source);
    }

    #[test]
    fn test_repeated_dependencies_stay_separate() {
        let source = "find_package(Boost)\nfind_package(Boost)\nelements_depends_on_subdirs(A)\nelements_depends_on_subdirs(A)\n";
        let doc = parse(source).unwrap();

        assert_eq!(doc.nodes().count(), 4);
    }

    #[test]
    fn test_invocation_spans() {
        let doc = parse("\n\nelements_subdir(Foo)\n").unwrap();

        let span = doc.invocations().next().unwrap().span().unwrap();
        assert_eq!(span.start.line, 3);
        assert_eq!(span.start.offset, 2);
        assert_eq!(span.len(), "elements_subdir(Foo)".len());
    }
}
