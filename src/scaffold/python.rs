//! `add-python-program`: a python entry point installed as a script.

use crate::error::Result;
use crate::grammar::InstallFlag;
use crate::model::{ensure_install_flag, ensure_python_executable, Document};

use super::naming::{join, validate_name};
use super::templates::{instantiate, PYTHON_PROGRAM_TEMPLATE};
use super::{
    conf_file_header, ensure_absent, make_dir, write_new_file, ModuleContext, ScaffoldReport,
};

const INIT_PY: &str = "from pkgutil import extend_path\n__path__ = extend_path(__path__, __name__)\n";

pub fn update_cmake_for_python_program(doc: &mut Document, name: &str) -> Result<()> {
    ensure_python_executable(doc, name)?;
    for flag in InstallFlag::ALL {
        ensure_install_flag(doc, flag);
    }
    Ok(())
}

pub fn add_python_program(ctx: &mut ModuleContext, name: &str) -> Result<ScaffoldReport> {
    validate_name("python program", name)?;
    let module = ctx.module.clone();

    let package_dir = join(&["python", module.as_str()]);
    let program_rel = join(&[package_dir.as_str(), &format!("{name}.py")]);
    let conf_dir = join(&["conf", module.as_str()]);
    ensure_absent(&ctx.dir.join(&program_rel), "python program")?;

    let template = ctx.template(PYTHON_PROGRAM_TEMPLATE)?;
    update_cmake_for_python_program(&mut ctx.document, name)?;

    let mut report = ScaffoldReport::default();
    for dir in [package_dir.as_str(), conf_dir.as_str(), "scripts"] {
        make_dir(&ctx.dir.join(dir))?;
    }
    write_new_file(
        &ctx.dir.join(&package_dir).join("__init__.py"),
        INIT_PY,
        &mut report,
    )?;
    write_new_file(
        &ctx.dir.join(&conf_dir).join(format!("{name}.conf")),
        &conf_file_header(name),
        &mut report,
    )?;

    let values = ctx
        .substitutions()
        .with("FILE", program_rel.as_str())
        .with("PROGRAMNAME", name);
    let program_path = ctx.dir.join(&program_rel);
    instantiate(&template, &program_path, &values)?;
    report.created.push(program_path);

    report.commit = Some(ctx.commit()?);
    Ok(report)
}
