//! `fmt` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::discovery::find_cmake_lists;
use crate::error::{CmakeError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::render;

use super::check::load_document;

/// Rewrite recognized macros in canonical layout
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Files or directories to format (directories are searched recursively)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print the formatted text to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,
}

/// Canonical text of a source file.
pub fn format_source(source: &str) -> Result<String> {
    let mut doc = crate::parser::parse(source)?;
    doc.canonicalize();
    Ok(render(&doc))
}

pub fn run(args: FmtArgs, printer: &Printer) -> Result<()> {
    let files = find_cmake_lists(&args.paths)?;
    let mut changed = 0;

    for path in &files {
        let (source, mut doc) = load_document(path)?;
        doc.canonicalize();
        let formatted = render(&doc);

        if args.stdout {
            print!("{formatted}");
            continue;
        }
        if formatted == source {
            continue;
        }
        changed += 1;
        if args.check {
            printer.warning("Would format", &display_path(path));
            continue;
        }
        fs::write(path, &formatted).map_err(|e| CmakeError::Io {
            path: path.clone(),
            message: format!("Failed to write file: {}", e),
        })?;
        printer.status("Formatted", &display_path(path));
    }

    if args.check && changed > 0 {
        return Err(CmakeError::Check {
            message: format!("{} not canonically formatted", plural(changed, "file is", "files are")),
            help: Some("Run `elements-cmake fmt` to rewrite them".to_string()),
        });
    }
    if !args.stdout {
        printer.info(
            "Finished",
            &format!(
                "{} checked, {} formatted",
                plural(files.len(), "file", "files"),
                if args.check { 0 } else { changed }
            ),
        );
    }
    Ok(())
}
