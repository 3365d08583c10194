//! `add-program`: a C++ executable with its configuration file.

use crate::error::Result;
use crate::grammar::{ListField, MacroKind};
use crate::model::{append_unique_values, ensure_executable, Document};

use super::naming::{join, validate_name};
use super::templates::{instantiate, PROGRAM_TEMPLATE};
use super::{
    add_dependencies, conf_file_header, ensure_absent, make_dir, write_new_file, ModuleContext,
    ScaffoldReport,
};

#[derive(Debug, Clone, Default)]
pub struct ProgramRequest {
    pub name: String,
    pub module_deps: Vec<String>,
    pub library_deps: Vec<String>,
}

pub fn update_cmake_for_program(doc: &mut Document, request: &ProgramRequest) -> Result<()> {
    let module = doc.require_module("Adding a C++ program")?;
    add_dependencies(doc, &request.module_deps, &request.library_deps);

    let has_library = doc.find_by_name(MacroKind::Library, &module).is_some();
    let source = format!("src/program/{}.cpp", request.name);
    let executable = ensure_executable(doc, &request.name, &source);

    let mut links: Vec<&str> = Vec::new();
    if has_library {
        links.push(&module);
    }
    links.extend(request.library_deps.iter().map(String::as_str));
    links.extend(request.module_deps.iter().map(String::as_str));
    append_unique_values(executable, ListField::LinkLibraries, links)?;
    Ok(())
}

pub fn add_cpp_program(ctx: &mut ModuleContext, request: &ProgramRequest) -> Result<ScaffoldReport> {
    validate_name("program", &request.name)?;
    let name = request.name.as_str();

    let source_rel = join(&["src/program", &format!("{name}.cpp")]);
    let conf_dir = join(&["conf", ctx.module.as_str()]);
    let conf_rel = join(&[conf_dir.as_str(), &format!("{name}.conf")]);
    ensure_absent(&ctx.dir.join(&source_rel), "program source")?;

    let template = ctx.template(PROGRAM_TEMPLATE)?;
    update_cmake_for_program(&mut ctx.document, request)?;

    let mut report = ScaffoldReport::default();
    make_dir(&ctx.dir.join("src/program"))?;
    make_dir(&ctx.dir.join(&conf_dir))?;

    let values = ctx
        .substitutions()
        .with("FILE", source_rel.as_str())
        .with("PROGRAMNAME", name);
    let source_path = ctx.dir.join(&source_rel);
    instantiate(&template, &source_path, &values)?;
    report.created.push(source_path);

    write_new_file(&ctx.dir.join(&conf_rel), &conf_file_header(name), &mut report)?;

    report.commit = Some(ctx.commit()?);
    Ok(report)
}
