//! `add-python-program` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::Printer;
use crate::scaffold::{add_python_program, ModuleContext};

/// Add a python program to the module in DIR
#[derive(Args, Debug)]
pub struct AddPythonProgramArgs {
    /// Program name
    pub name: String,

    /// Module directory
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: AddPythonProgramArgs, printer: &Printer) -> Result<()> {
    let config = Config::discover(&args.dir)?;
    let mut ctx = ModuleContext::load(&args.dir, config)?;
    printer.status("Adding", &format!("python program {} to {}", args.name, ctx.module));

    let report = add_python_program(&mut ctx, &args.name)?;

    super::print_report(printer, &ctx, &report);
    Ok(())
}
