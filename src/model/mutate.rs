//! Ensure-by-name mutators used by the scaffolding layer.
//!
//! Every `ensure_*` function is idempotent: it returns the existing node for
//! the (kind, name) pair, or creates one. Values are merged with
//! [`append_unique_values`], so re-running a scaffolding step leaves the
//! document unchanged.

use crate::error::{CmakeError, Result};
use crate::grammar::{Group, InstallFlag, ListField, MacroKind};

use super::document::Document;
use super::node::{
    to_token, Executable, Library, MacroNode, ModuleDependency, Package, PythonExecutable,
    UnitTest, ValueList,
};

/// Append each value missing from `field`, in order. Returns how many were added.
///
/// [`ListField::ExtraArgs`] takes `KEYWORD value…` groups instead: each group
/// is appended whole unless its keyword is already present.
pub fn append_unique_values<I, S>(node: &mut MacroNode, field: ListField, values: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kind = node.kind();
    let list = node.list_mut(field).ok_or_else(|| CmakeError::Field {
        kind: kind.command().to_string(),
        field: field.to_string(),
    })?;
    if field == ListField::ExtraArgs {
        return append_extra_groups(list, kind, values);
    }
    Ok(list.append_unique(values))
}

fn append_extra_groups<I, S>(list: &mut ValueList, kind: MacroKind, values: I) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = kind.schema();
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for value in values {
        let value = value.as_ref();
        if schema.is_extra_keyword(value) {
            groups.push((value.to_string(), Vec::new()));
            continue;
        }
        match groups.last_mut() {
            Some((_, group)) => group.push(to_token(value)),
            None => {
                let keywords: Vec<&str> = schema
                    .keywords
                    .iter()
                    .filter(|k| k.group == Group::Extra)
                    .map(|k| k.token)
                    .collect();
                return Err(CmakeError::ExtraArgs {
                    kind: kind.command().to_string(),
                    found: value.to_string(),
                    help: Some(format!("Start the group with one of: {}", keywords.join(", "))),
                });
            }
        }
    }

    let mut added = 0;
    for (keyword, group) in groups {
        if list.contains(&keyword) {
            continue;
        }
        added += 1 + group.len();
        list.push_group(keyword, group);
    }
    Ok(added)
}

/// `elements_add_library(<name>)`, created with `PUBLIC_HEADERS <name>`.
pub fn ensure_library<'d>(doc: &'d mut Document, name: &str) -> &'d mut MacroNode {
    doc.ensure_target(MacroKind::Library, name, || {
        MacroNode::Library(Library {
            name: to_token(name),
            sources: ValueList::new(),
            link_libraries: ValueList::new(),
            include_dirs: ValueList::new(),
            public_headers: [name].into_iter().collect(),
        })
    })
}

/// The library named after the module.
pub fn ensure_module_library(doc: &mut Document) -> Result<&mut MacroNode> {
    let module = doc.require_module("Adding the module library")?;
    Ok(ensure_library(doc, &module))
}

pub fn ensure_executable<'d>(doc: &'d mut Document, name: &str, source: &str) -> &'d mut MacroNode {
    doc.ensure_target(MacroKind::Executable, name, || {
        MacroNode::Executable(Executable {
            name: to_token(name),
            source: to_token(source),
            link_libraries: ValueList::new(),
            include_dirs: ValueList::new(),
        })
    })
}

pub fn ensure_unit_test<'d>(
    doc: &'d mut Document,
    name: &str,
    framework: Option<&str>,
) -> &'d mut MacroNode {
    doc.ensure_target(MacroKind::UnitTest, name, || {
        MacroNode::UnitTest(UnitTest {
            name: to_token(name),
            sources: ValueList::new(),
            link_libraries: ValueList::new(),
            include_dirs: ValueList::new(),
            framework: framework.map(to_token),
            extra_args: ValueList::new(),
        })
    })
}

/// `elements_add_python_program(<name> <Module>.<name>)`.
pub fn ensure_python_executable<'d>(doc: &'d mut Document, name: &str) -> Result<&'d mut MacroNode> {
    let module = doc.require_module("Adding a python program")?;
    Ok(doc.ensure_target(MacroKind::PythonExecutable, name, || {
        MacroNode::PythonExecutable(PythonExecutable {
            name: to_token(name),
            module: to_token(&format!("{module}.{name}")),
        })
    }))
}

/// `find_package(<name>)`. An existing declaration is reused even if it
/// occurs several times; duplicates in the file are never merged.
pub fn ensure_package_dependency<'d>(doc: &'d mut Document, name: &str) -> &'d mut MacroNode {
    doc.ensure_target(MacroKind::Package, name, || {
        MacroNode::Package(Package {
            name: to_token(name),
            args: Vec::new(),
            components: ValueList::new(),
        })
    })
}

/// `elements_depends_on_subdirs(<name>)`, unless some existing
/// declaration already lists the module.
pub fn ensure_module_dependency<'d>(doc: &'d mut Document, name: &str) -> &'d mut MacroNode {
    doc.ensure_target(MacroKind::ModuleDependency, name, || {
        MacroNode::ModuleDependency(ModuleDependency {
            names: [name].into_iter().collect(),
        })
    })
}

pub fn ensure_install_flag(doc: &mut Document, flag: InstallFlag) -> bool {
    doc.ensure_flag(flag)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse;
    use crate::render::render;

    #[test]
    fn test_append_unique_values_is_idempotent() {
        let mut doc = parse("elements_add_library(Foo src/lib/A.cpp)\n").unwrap();
        let lib = ensure_library(&mut doc, "Foo");

        assert_eq!(append_unique_values(lib, ListField::Sources, ["src/lib/B.cpp", "src/lib/A.cpp"]).unwrap(), 1);
        assert_eq!(append_unique_values(lib, ListField::Sources, ["src/lib/B.cpp", "src/lib/A.cpp"]).unwrap(), 0);

        assert_eq!(
            lib.list(ListField::Sources).unwrap().as_slice(),
            ["src/lib/A.cpp", "src/lib/B.cpp"]
        );
    }

    #[test]
    fn test_append_to_missing_field_fails() {
        let mut doc = parse("elements_subdir(Foo)\n").unwrap();
        let exe = ensure_python_executable(&mut doc, "Prog").unwrap();

        let err = append_unique_values(exe, ListField::Sources, ["x.py"]).unwrap_err();
        assert!(matches!(err, CmakeError::Field { .. }));
    }

    #[test]
    fn test_append_existing_values_keeps_original_text() {
        let source = "elements_add_library(Foo  src/lib/A.cpp   LINK_LIBRARIES ElementsKernel)\n";
        let mut doc = parse(source).unwrap();

        let lib = ensure_library(&mut doc, "Foo");
        append_unique_values(lib, ListField::LinkLibraries, ["ElementsKernel"]).unwrap();

        assert_eq!(render(&doc), source);
    }

    #[test]
    fn test_new_library_defaults() {
        let mut doc = parse("elements_subdir(Foo)\n").unwrap();
        ensure_module_library(&mut doc).unwrap();

        assert_eq!(
            render(&doc),
            "elements_subdir(Foo)\nelements_add_library(Foo\n  PUBLIC_HEADERS\n    Foo)\n"
        );
    }

    #[test]
    fn test_python_executable_needs_module() {
        let mut doc = parse("# not a module\n").unwrap();

        let err = ensure_python_executable(&mut doc, "Prog").unwrap_err();
        assert!(matches!(err, CmakeError::MissingContext { .. }));
        assert_eq!(render(&doc), "# not a module\n");
    }

    #[test]
    fn test_python_executable_module_path() {
        let mut doc = parse("elements_subdir(Mod)\n").unwrap();
        ensure_python_executable(&mut doc, "Prog").unwrap();
        ensure_python_executable(&mut doc, "Prog").unwrap();

        assert_eq!(
            render(&doc),
            "elements_subdir(Mod)\nelements_add_python_program(Prog Mod.Prog)\n"
        );
    }

    #[test]
    fn test_module_dependency_found_in_multi_name_list() {
        let source = "elements_depends_on_subdirs(ElementsKernel ElementsServices)\n";
        let mut doc = parse(source).unwrap();

        ensure_module_dependency(&mut doc, "ElementsServices");
        assert_eq!(render(&doc), source);

        ensure_module_dependency(&mut doc, "Other");
        assert_eq!(
            render(&doc),
            "elements_depends_on_subdirs(ElementsKernel ElementsServices)\nelements_depends_on_subdirs(Other)\n"
        );
    }

    #[test]
    fn test_package_duplicates_are_not_merged() {
        let source = "find_package(Boost)\nfind_package(Boost COMPONENTS system)\n";
        let mut doc = parse(source).unwrap();

        let pkg = ensure_package_dependency(&mut doc, "Boost");
        assert!(pkg.list(ListField::Components).unwrap().is_empty());

        assert_eq!(doc.nodes_of(MacroKind::Package).count(), 2);
        assert_eq!(render(&doc), source);
    }

    #[test]
    fn test_unit_test_framework() {
        let mut doc = crate::model::Document::new();
        let test = ensure_unit_test(&mut doc, "Foo_test", Some("Boost"));
        append_unique_values(test, ListField::Sources, ["tests/src/Foo_test.cpp"]).unwrap();

        assert_eq!(
            render(&doc),
            "elements_add_unit_test(Foo_test\n  tests/src/Foo_test.cpp\n  TYPE\n    Boost)\n"
        );
    }

    #[test]
    fn test_extra_args_append_whole_groups() {
        let mut doc = parse("elements_add_unit_test(Foo_test t.cpp LABELS 30 TIMEOUT 30)\n").unwrap();
        let test = ensure_unit_test(&mut doc, "Foo_test", None);

        assert_eq!(
            append_unique_values(test, ListField::ExtraArgs, ["TIMEOUT", "60"]).unwrap(),
            0
        );
        assert_eq!(
            append_unique_values(test, ListField::ExtraArgs, ["ENVIRONMENT", "A=1", "B=1", "TIMEOUT", "60"])
                .unwrap(),
            3
        );

        assert_eq!(
            test.list(ListField::ExtraArgs).unwrap().as_slice(),
            ["LABELS", "30", "TIMEOUT", "30", "ENVIRONMENT", "A=1", "B=1"]
        );
    }

    #[test]
    fn test_extra_args_must_start_with_keyword() {
        let mut doc = crate::model::Document::new();
        let test = ensure_unit_test(&mut doc, "Foo_test", None);

        let err = append_unique_values(test, ListField::ExtraArgs, ["30", "TIMEOUT"]).unwrap_err();

        assert!(matches!(err, CmakeError::ExtraArgs { .. }));
        assert!(test.list(ListField::ExtraArgs).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_with_quoted_name_is_idempotent() {
        let mut doc = crate::model::Document::new();

        ensure_library(&mut doc, "My Lib");
        ensure_library(&mut doc, "My Lib");
        ensure_unit_test(&mut doc, "My Test", None);
        ensure_unit_test(&mut doc, "My Test", None);

        assert_eq!(doc.nodes_of(MacroKind::Library).count(), 1);
        assert_eq!(doc.nodes_of(MacroKind::UnitTest).count(), 1);
        assert!(doc.find_by_name(MacroKind::Library, "My Lib").is_some());

        let reparsed = parse(&render(&doc)).unwrap();
        assert_eq!(reparsed.nodes().count(), 2);
    }

    #[test]
    fn test_install_flags() {
        let mut doc = parse("elements_install_conf_files()\n").unwrap();

        for flag in InstallFlag::ALL {
            ensure_install_flag(&mut doc, flag);
        }

        assert_eq!(
            render(&doc),
            "elements_install_conf_files()\nelements_install_python_modules()\nelements_install_scripts()\n"
        );
    }
}
