//! Canonical text layout of recognized macros.
//!
//! A node with no keyword values and at most one implicit value fits on one
//! line. Otherwise implicit values follow the head one per line (two-space
//! indent) and each non-empty keyword group puts its keyword on its own line
//! with the values indented four spaces. The closing parenthesis ends the
//! last line.

use crate::grammar::{MacroKind, COMPONENTS, INCLUDE_DIRS, LINK_LIBRARIES, PUBLIC_HEADERS, TYPE};
use crate::model::MacroNode;

const VALUE_INDENT: &str = "  ";
const GROUP_VALUE_INDENT: &str = "    ";

struct Layout<'a> {
    kind: MacroKind,
    head: Vec<&'a str>,
    implicit: Vec<&'a str>,
    groups: Vec<(&'a str, Vec<&'a str>)>,
}

impl<'a> Layout<'a> {
    fn new(kind: MacroKind) -> Self {
        Self {
            kind,
            head: Vec::new(),
            implicit: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn head(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.head.extend(values);
        self
    }

    fn implicit(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        self.implicit.extend(values);
        self
    }

    fn group(mut self, keyword: &'a str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        if !values.is_empty() {
            self.groups.push((keyword, values));
        }
        self
    }

    /// Extra arguments start a new group at every extra keyword.
    fn extra(mut self, tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let schema = self.kind.schema();
        for token in tokens {
            if schema.is_extra_keyword(token) {
                self.groups.push((token, Vec::new()));
                continue;
            }
            match self.groups.last_mut() {
                Some((_, values)) => values.push(token),
                None => self.implicit.push(token),
            }
        }
        self
    }

    fn write(&self) -> String {
        let mut out = String::from(self.kind.command());
        out.push('(');
        out.push_str(&self.head.join(" "));

        if self.groups.is_empty() && self.implicit.len() <= 1 {
            if let Some(value) = self.implicit.first() {
                if !self.head.is_empty() {
                    out.push(' ');
                }
                out.push_str(value);
            }
            out.push(')');
            return out;
        }

        let line = |out: &mut String, indent: &str, text: &str| {
            out.push('\n');
            out.push_str(indent);
            out.push_str(text);
        };

        for value in &self.implicit {
            line(&mut out, VALUE_INDENT, value);
        }
        for (keyword, values) in &self.groups {
            line(&mut out, VALUE_INDENT, keyword);
            for value in values {
                line(&mut out, GROUP_VALUE_INDENT, value);
            }
        }
        out.push(')');
        out
    }
}

/// Render a node in canonical form.
pub fn render_node(node: &MacroNode) -> String {
    let layout = match node {
        MacroNode::Subdir(n) => Layout::new(MacroKind::Subdir).head([n.name.as_str()]),
        MacroNode::Package(n) => Layout::new(MacroKind::Package)
            .head([n.name.as_str()])
            .head(n.args.iter().map(String::as_str))
            .group(COMPONENTS, n.components.iter()),
        MacroNode::ModuleDependency(n) => {
            Layout::new(MacroKind::ModuleDependency).implicit(n.names.iter())
        }
        MacroNode::Library(n) => Layout::new(MacroKind::Library)
            .head([n.name.as_str()])
            .implicit(n.sources.iter())
            .group(LINK_LIBRARIES, n.link_libraries.iter())
            .group(INCLUDE_DIRS, n.include_dirs.iter())
            .group(PUBLIC_HEADERS, n.public_headers.iter()),
        MacroNode::Executable(n) => Layout::new(MacroKind::Executable)
            .head([n.name.as_str(), n.source.as_str()])
            .group(LINK_LIBRARIES, n.link_libraries.iter())
            .group(INCLUDE_DIRS, n.include_dirs.iter()),
        MacroNode::UnitTest(n) => Layout::new(MacroKind::UnitTest)
            .head([n.name.as_str()])
            .implicit(n.sources.iter())
            .group(LINK_LIBRARIES, n.link_libraries.iter())
            .group(INCLUDE_DIRS, n.include_dirs.iter())
            .group(TYPE, n.framework.as_deref())
            .extra(n.extra_args.iter()),
        MacroNode::PythonExecutable(n) => Layout::new(MacroKind::PythonExecutable)
            .head([n.name.as_str(), n.module.as_str()]),
        MacroNode::InstallFlag(flag) => Layout::new(MacroKind::InstallFlag(*flag)),
    };
    layout.write()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{InstallFlag, ListField};
    use crate::model::{append_unique_values, ensure_library, Document, Package, ValueList};

    #[test]
    fn test_single_line_forms() {
        let node = MacroNode::Package(Package {
            name: "Boost".into(),
            args: vec!["1.53".into(), "REQUIRED".into()],
            components: ValueList::new(),
        });
        assert_eq!(render_node(&node), "find_package(Boost 1.53 REQUIRED)");

        assert_eq!(
            render_node(&MacroNode::InstallFlag(InstallFlag::ConfFiles)),
            "elements_install_conf_files()"
        );
    }

    #[test]
    fn test_library_layout() {
        let mut doc = Document::new();
        let lib = ensure_library(&mut doc, "Foo");
        append_unique_values(lib, ListField::Sources, ["src/lib/A.cpp", "src/lib/B.cpp"]).unwrap();
        append_unique_values(lib, ListField::LinkLibraries, ["ElementsKernel"]).unwrap();

        insta::assert_snapshot!(render_node(lib), @r"
        elements_add_library(Foo
          src/lib/A.cpp
          src/lib/B.cpp
          LINK_LIBRARIES
            ElementsKernel
          PUBLIC_HEADERS
            Foo)
        ");
    }

    #[test]
    fn test_module_dependency_layout() {
        let one = MacroNode::ModuleDependency(crate::model::ModuleDependency {
            names: ["ElementsKernel"].into_iter().collect(),
        });
        assert_eq!(render_node(&one), "elements_depends_on_subdirs(ElementsKernel)");

        let two = MacroNode::ModuleDependency(crate::model::ModuleDependency {
            names: ["ElementsKernel", "ElementsServices"].into_iter().collect(),
        });
        assert_eq!(
            render_node(&two),
            "elements_depends_on_subdirs(\n  ElementsKernel\n  ElementsServices)"
        );
    }

    #[test]
    fn test_unit_test_extra_groups() {
        let node = MacroNode::UnitTest(crate::model::UnitTest {
            name: "Foo_test".into(),
            sources: ["tests/src/Foo_test.cpp"].into_iter().collect(),
            link_libraries: ["Foo"].into_iter().collect(),
            include_dirs: ValueList::new(),
            framework: Some("Boost".into()),
            extra_args: ValueList::verbatim(vec![
                "EXECUTABLE".into(),
                "Foo_test_exe".into(),
                "TIMEOUT".into(),
                "30".into(),
            ]),
        });

        insta::assert_snapshot!(render_node(&node), @r"
        elements_add_unit_test(Foo_test
          tests/src/Foo_test.cpp
          LINK_LIBRARIES
            Foo
          TYPE
            Boost
          EXECUTABLE
            Foo_test_exe
          TIMEOUT
            30)
        ");
    }
}
