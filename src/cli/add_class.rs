//! `add-class` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::Printer;
use crate::scaffold::{add_cpp_class, ClassRequest, ModuleContext};

/// Add a C++ class to the module in DIR
#[derive(Args, Debug)]
pub struct AddClassArgs {
    /// Class name, optionally below a sub-directory (e.g. geometry/Circle)
    pub class: String,

    /// Elements module the class depends on (repeatable)
    #[arg(short = 'm', long = "module-dependency")]
    pub module_deps: Vec<String>,

    /// External library the class depends on (repeatable)
    #[arg(short = 'l', long = "library-dependency")]
    pub library_deps: Vec<String>,

    /// Module directory
    #[arg(short = 'C', long = "directory", default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: AddClassArgs, printer: &Printer) -> Result<()> {
    let config = Config::discover(&args.dir)?;
    let mut ctx = ModuleContext::load(&args.dir, config)?;
    printer.status("Adding", &format!("class {} to {}", args.class, ctx.module));

    let request = ClassRequest {
        path: args.class,
        module_deps: args.module_deps,
        library_deps: args.library_deps,
    };
    let report = add_cpp_class(&mut ctx, &request)?;

    super::print_report(printer, &ctx, &report);
    Ok(())
}
