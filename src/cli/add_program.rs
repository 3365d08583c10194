//! `add-program` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::Printer;
use crate::scaffold::{add_cpp_program, ModuleContext, ProgramRequest};

/// Add a C++ program to the module in DIR
#[derive(Args, Debug)]
pub struct AddProgramArgs {
    /// Program name
    pub name: String,

    /// Elements module the program depends on (repeatable)
    #[arg(short = 'm', long = "module-dependency")]
    pub module_deps: Vec<String>,

    /// External library the program depends on (repeatable)
    #[arg(short = 'l', long = "library-dependency")]
    pub library_deps: Vec<String>,

    /// Module directory
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: AddProgramArgs, printer: &Printer) -> Result<()> {
    let config = Config::discover(&args.dir)?;
    let mut ctx = ModuleContext::load(&args.dir, config)?;
    printer.status("Adding", &format!("program {} to {}", args.name, ctx.module));

    let request = ProgramRequest {
        name: args.name,
        module_deps: args.module_deps,
        library_deps: args.library_deps,
    };
    let report = add_cpp_program(&mut ctx, &request)?;

    super::print_report(printer, &ctx, &report);
    Ok(())
}
