pub mod add_class;
pub mod add_program;
pub mod add_python;
pub mod check;
pub mod completions;
pub mod fmt;

use clap::{Parser, Subcommand};

use crate::output::{display_path, Printer};
use crate::scaffold::{Commit, ModuleContext, ScaffoldReport};

/// elements-cmake - Edit Elements CMakeLists.txt files without losing their formatting
#[derive(Parser, Debug)]
#[command(name = "elements-cmake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a C++ class, its unit test, and register both in CMakeLists.txt
    AddClass(add_class::AddClassArgs),

    /// Add a C++ program and register it in CMakeLists.txt
    AddProgram(add_program::AddProgramArgs),

    /// Add a python program and register it in CMakeLists.txt
    AddPythonProgram(add_python::AddPythonProgramArgs),

    /// Parse CMakeLists.txt files and report the recognized macros
    Check(check::CheckArgs),

    /// Rewrite recognized macros in canonical layout
    Fmt(fmt::FmtArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Print the files a scaffolding step touched.
pub(crate) fn print_report(printer: &Printer, ctx: &ModuleContext, report: &ScaffoldReport) {
    for path in &report.created {
        printer.status("Created", &display_path(path));
    }
    for path in &report.kept {
        printer.warning("Skipping", &format!("{} (already exists)", display_path(path)));
    }
    match &report.commit {
        Some(Commit::Written { backup }) => {
            if let Some(backup) = backup {
                printer.info("Backed up", &display_path(backup));
            }
            printer.status("Updated", &display_path(&ctx.cmake_path()));
        }
        Some(Commit::Unchanged) | None => {
            printer.info("Unchanged", &display_path(&ctx.cmake_path()));
        }
    }
}
