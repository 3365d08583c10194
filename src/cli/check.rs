//! `check` command implementation.
//!
//! Parses every CMakeLists.txt found, verifies that rendering an unmodified
//! document reproduces the file, and reports the recognized macros.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::discovery::find_cmake_lists;
use crate::error::{CmakeError, Result};
use crate::model::{Document, NodeSummary};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse;
use crate::render::render;

/// Parse CMakeLists.txt files and report the recognized macros
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check (directories are searched recursively)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Print the recognized macros of every file as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    module: Option<&'a str>,
    macros: Vec<NodeSummary<'a>>,
}

/// Read and parse one file. Syntax errors carry the file name.
pub(crate) fn load_document(path: &Path) -> Result<(String, Document)> {
    let source = fs::read_to_string(path).map_err(|e| CmakeError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;
    let doc = parse(&source).map_err(|e| e.with_source_name(path.display().to_string()))?;
    Ok((source, doc))
}

fn describe(doc: &Document) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in doc.nodes() {
        *counts.entry(node.kind().command()).or_default() += 1;
    }
    let total = counts.values().sum();
    if total == 0 {
        return "no recognized macros".to_string();
    }
    let targets: Vec<String> = counts
        .iter()
        .map(|(command, n)| format!("{command} x{n}"))
        .collect();
    format!("{}: {}", plural(total, "macro", "macros"), targets.join(", "))
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let files = find_cmake_lists(&args.paths)?;
    if files.is_empty() {
        return Err(CmakeError::Check {
            message: "no CMakeLists.txt found".to_string(),
            help: Some("Pass a module or project directory".to_string()),
        });
    }

    let mut documents = Vec::new();
    let mut failures = 0;
    for path in &files {
        let loaded = load_document(path).and_then(|(source, doc)| {
            if render(&doc) == source {
                Ok(doc)
            } else {
                Err(CmakeError::RoundTrip { path: path.clone() })
            }
        });
        match loaded {
            Ok(doc) => {
                printer.status(
                    "Checked",
                    &format!("{} ({})", display_path(path), describe(&doc)),
                );
                documents.push((path, doc));
            }
            // A single file gets the full diagnostic report.
            Err(e) if files.len() == 1 => return Err(e),
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", display_path(path), e));
                failures += 1;
            }
        }
    }

    if args.json {
        let reports: Vec<FileReport<'_>> = documents
            .iter()
            .map(|(path, doc)| FileReport {
                path: path.display().to_string(),
                module: doc.module_name(),
                macros: doc.summaries(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&reports).map_err(|e| CmakeError::Check {
            message: format!("Failed to serialize report: {}", e),
            help: None,
        })?;
        println!("{json}");
    }

    if failures > 0 {
        return Err(CmakeError::Check {
            message: format!(
                "{} of {} could not be parsed",
                failures,
                plural(files.len(), "file", "files")
            ),
            help: Some("Run check on a single file to see the full error".to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_describe() {
        let doc = parse(
            "elements_subdir(Foo)\nelements_add_unit_test(A a.cpp)\nelements_add_unit_test(B b.cpp)\n",
        )
        .unwrap();
        assert_eq!(
            describe(&doc),
            "3 macros: elements_add_unit_test x2, elements_subdir x1"
        );
        assert_eq!(describe(&parse("project(X)\n").unwrap()), "no recognized macros");
    }

    #[test]
    fn test_run_reports_failures() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Good")).unwrap();
        fs::create_dir_all(dir.path().join("Bad")).unwrap();
        fs::write(dir.path().join("Good/CMakeLists.txt"), "elements_subdir(Good)\n").unwrap();
        fs::write(dir.path().join("Bad/CMakeLists.txt"), "elements_add_library(Bad\n").unwrap();

        let args = CheckArgs {
            paths: vec![dir.path().to_path_buf()],
            json: false,
        };
        let err = run(args, &Printer::quiet()).unwrap_err();

        assert!(matches!(err, CmakeError::Check { .. }));
        assert!(err.to_string().contains("1 of 2 files"));
    }

    #[test]
    fn test_run_single_file_returns_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CMakeLists.txt");
        fs::write(&path, "elements_subdir(Foo\n").unwrap();

        let args = CheckArgs {
            paths: vec![path],
            json: false,
        };
        let err = run(args, &Printer::quiet()).unwrap_err();

        assert!(matches!(err, CmakeError::Syntax { .. }));
    }

    #[test]
    fn test_file_report_json() {
        let doc = parse("elements_subdir(Foo)\nelements_add_executable(Run src/program/Run.cpp)\n")
            .unwrap();
        let report = FileReport {
            path: "CMakeLists.txt".to_string(),
            module: doc.module_name(),
            macros: doc.summaries(),
        };

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["module"], "Foo");
        assert_eq!(value["macros"][1]["command"], "elements_add_executable");
        assert_eq!(value["macros"][1]["name"], "Run");
        assert_eq!(value["macros"][1]["modified"], false);
        assert_eq!(value["macros"][1]["span"]["start"]["line"], 2);
    }
}
