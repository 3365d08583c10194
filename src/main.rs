use clap::Parser;
use elements_cmake::cli::{Cli, Commands};
use elements_cmake::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::AddClass(args) => elements_cmake::cli::add_class::run(args, &printer)?,
        Commands::AddProgram(args) => elements_cmake::cli::add_program::run(args, &printer)?,
        Commands::AddPythonProgram(args) => elements_cmake::cli::add_python::run(args, &printer)?,
        Commands::Check(args) => elements_cmake::cli::check::run(args, &printer)?,
        Commands::Fmt(args) => elements_cmake::cli::fmt::run(args, &printer)?,
        Commands::Completions(args) => elements_cmake::cli::completions::run(args)?,
    }

    Ok(())
}
