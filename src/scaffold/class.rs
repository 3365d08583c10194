//! `add-class`: a C++ class with its header, source and unit test.

use crate::error::Result;
use crate::grammar::ListField;
use crate::model::{append_unique_values, ensure_library, ensure_unit_test, Document};

use super::naming::{include_guard, join, split_class_path};
use super::templates::{
    instantiate, CLASS_HEADER_TEMPLATE, CLASS_SOURCE_TEMPLATE, UNIT_TEST_TEMPLATE,
};
use super::{add_dependencies, ensure_absent, make_dir, ModuleContext, ScaffoldReport};

#[derive(Debug, Clone, Default)]
pub struct ClassRequest {
    /// `ClassName` or `sub/dir/ClassName`.
    pub path: String,
    pub module_deps: Vec<String>,
    pub library_deps: Vec<String>,
}

/// Register a class in the module library and add its unit test.
pub fn update_cmake_for_class(
    doc: &mut Document,
    subdir: &str,
    class: &str,
    request: &ClassRequest,
    framework: &str,
) -> Result<()> {
    let module = doc.require_module("Adding a C++ class")?;
    add_dependencies(doc, &request.module_deps, &request.library_deps);

    let library = ensure_library(doc, &module);
    append_unique_values(
        library,
        ListField::Sources,
        [join(&["src/lib", subdir, &format!("{class}.cpp")])],
    )?;
    append_unique_values(
        library,
        ListField::LinkLibraries,
        request.library_deps.iter().chain(&request.module_deps),
    )?;

    let test = ensure_unit_test(doc, &format!("{class}_test"), Some(framework));
    append_unique_values(
        test,
        ListField::Sources,
        [join(&["tests/src", subdir, &format!("{class}_test.cpp")])],
    )?;
    append_unique_values(test, ListField::LinkLibraries, [&module])?;
    Ok(())
}

pub fn add_cpp_class(ctx: &mut ModuleContext, request: &ClassRequest) -> Result<ScaffoldReport> {
    let (subdir, class) = split_class_path(&request.path)?;
    let module = ctx.module.clone();

    let header_rel = join(&[module.as_str(), subdir.as_str(), &format!("{class}.h")]);
    let source_rel = join(&["src/lib", subdir.as_str(), &format!("{class}.cpp")]);
    let test_rel = join(&["tests/src", subdir.as_str(), &format!("{class}_test.cpp")]);
    ensure_absent(&ctx.dir.join(&header_rel), "class header")?;

    let header_template = ctx.template(CLASS_HEADER_TEMPLATE)?;
    let source_template = ctx.template(CLASS_SOURCE_TEMPLATE)?;
    let test_template = ctx.template(UNIT_TEST_TEMPLATE)?;

    let framework = ctx.config.test_framework.clone();
    update_cmake_for_class(&mut ctx.document, &subdir, &class, request, &framework)?;

    let subdir_prefix = if subdir.is_empty() {
        String::new()
    } else {
        format!("{subdir}{}", std::path::MAIN_SEPARATOR)
    };
    let values = ctx
        .substitutions()
        .with("SUBDIR", subdir_prefix)
        .with("CLASSNAME", class.as_str())
        .with("DEFINE_WORDS", include_guard(&header_rel));

    let mut report = ScaffoldReport::default();
    for (template, rel) in [
        (&header_template, &header_rel),
        (&source_template, &source_rel),
        (&test_template, &test_rel),
    ] {
        let dest = ctx.dir.join(rel);
        if let Some(parent) = dest.parent() {
            make_dir(parent)?;
        }
        instantiate(template, &dest, &values.clone().with("FILE", rel.as_str()))?;
        report.created.push(dest);
    }

    report.commit = Some(ctx.commit()?);
    Ok(report)
}
