//! Module scaffolding: generate source files from templates and register
//! them in the module's CMakeLists.txt.
//!
//! Each generator follows the same order. It checks that the target file
//! does not exist and that every template can be found, then applies the
//! CMake changes to the in-memory document. Only then are directories and
//! files created and the document committed. A failure in the first two
//! steps leaves the module directory untouched.

mod class;
pub mod naming;
mod program;
mod python;
pub mod templates;

pub use class::{add_cpp_class, update_cmake_for_class, ClassRequest};
pub use program::{add_cpp_program, update_cmake_for_program, ProgramRequest};
pub use python::{add_python_program, update_cmake_for_python_program};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{CmakeError, Result};
use crate::model::{ensure_module_dependency, ensure_package_dependency, Document};
use crate::parser::parse;
use crate::render::render;

use templates::Substitutions;

pub const CMAKE_LISTS_FILE: &str = "CMakeLists.txt";
pub const BACKUP_SUFFIX: &str = "~";

/// A module directory with its parsed CMakeLists.txt.
#[derive(Debug)]
pub struct ModuleContext {
    pub dir: PathBuf,
    pub module: String,
    pub config: Config,
    pub document: Document,
    source: String,
}

/// What a commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Unchanged,
    Written { backup: Option<PathBuf> },
}

/// Files touched by a scaffolding step.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    /// Existing files left as they were.
    pub kept: Vec<PathBuf>,
    pub commit: Option<Commit>,
}

impl ModuleContext {
    pub fn load(dir: &Path, config: Config) -> Result<Self> {
        let path = dir.join(CMAKE_LISTS_FILE);
        let source = fs::read_to_string(&path).map_err(|e| CmakeError::Io {
            path: path.clone(),
            message: format!("Failed to read {}: {}", CMAKE_LISTS_FILE, e),
        })?;
        let document =
            parse(&source).map_err(|e| e.with_source_name(path.display().to_string()))?;
        let module = document.require_module("Scaffolding")?;

        Ok(Self {
            dir: dir.to_path_buf(),
            module,
            config,
            document,
            source,
        })
    }

    pub fn cmake_path(&self) -> PathBuf {
        self.dir.join(CMAKE_LISTS_FILE)
    }

    pub fn is_changed(&self) -> bool {
        render(&self.document) != self.source
    }

    /// Write the document back, keeping a backup of the previous text when
    /// configured.
    pub fn commit(&mut self) -> Result<Commit> {
        let text = render(&self.document);
        if text == self.source {
            return Ok(Commit::Unchanged);
        }

        let path = self.cmake_path();
        let backup = if self.config.backup {
            let backup = self.dir.join(format!("{CMAKE_LISTS_FILE}{BACKUP_SUFFIX}"));
            fs::write(&backup, &self.source).map_err(|e| CmakeError::Io {
                path: backup.clone(),
                message: format!("Failed to write backup: {}", e),
            })?;
            Some(backup)
        } else {
            None
        };

        fs::write(&path, &text).map_err(|e| CmakeError::Io {
            path: path.clone(),
            message: format!("Failed to write {}: {}", CMAKE_LISTS_FILE, e),
        })?;
        self.source = text;
        Ok(Commit::Written { backup })
    }

    /// Placeholders shared by every template.
    pub fn substitutions(&self) -> Substitutions {
        Substitutions::new()
            .with("DATE", chrono::Local::now().format("%x").to_string())
            .with("AUTHOR", self.config.author())
            .with("OSSEP", std::path::MAIN_SEPARATOR.to_string())
            .with("MODULENAME", self.module.as_str())
    }

    fn template(&self, file: &str) -> Result<PathBuf> {
        templates::find_template(&self.config.aux_path, file)
    }
}

/// `find_package` for each library dependency and
/// `elements_depends_on_subdirs` for each module dependency.
pub(crate) fn add_dependencies(doc: &mut Document, module_deps: &[String], library_deps: &[String]) {
    for dep in library_deps {
        ensure_package_dependency(doc, dep);
    }
    for dep in module_deps {
        ensure_module_dependency(doc, dep);
    }
}

pub(crate) fn ensure_absent(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        return Err(CmakeError::Scaffold {
            message: format!("The {what} already exists: {}", path.display()),
            help: Some("Choose another name or remove the existing file".to_string()),
        });
    }
    Ok(())
}

pub(crate) fn make_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| CmakeError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to create directory: {}", e),
    })
}

/// Write `content` unless the file exists. Returns whether it was written.
pub(crate) fn write_new_file(path: &Path, content: &str, report: &mut ScaffoldReport) -> Result<()> {
    if path.exists() {
        report.kept.push(path.to_path_buf());
        return Ok(());
    }
    fs::write(path, content).map_err(|e| CmakeError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })?;
    report.created.push(path.to_path_buf());
    Ok(())
}

/// Header of a program's `.conf` file.
pub(crate) fn conf_file_header(program: &str) -> String {
    let rule = "#".repeat(78);
    format!(
        "{rule}\n#\n# Configuration file for the <{program}> program\n#\n{rule}\n\
         # Write your program options here. e.g. : option = string\n"
    )
}


#[cfg(test)]
mod tests {
    use super::test_support::Sandbox;
    use super::*;

    #[test]
    fn test_load_requires_module() {
        let sandbox = Sandbox::new("project(Foo)\n");
        let err = ModuleContext::load(sandbox.dir(), sandbox.config()).unwrap_err();
        assert!(matches!(err, CmakeError::MissingContext { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ModuleContext::load(dir.path(), Config::default()).unwrap_err();
        assert!(matches!(err, CmakeError::Io { .. }));
    }

    #[test]
    fn test_commit_unchanged_writes_nothing() {
        let sandbox = Sandbox::new("elements_subdir(Foo)\n");
        let mut ctx = ModuleContext::load(sandbox.dir(), sandbox.config()).unwrap();

        assert_eq!(ctx.commit().unwrap(), Commit::Unchanged);
        assert!(!sandbox.path("CMakeLists.txt~").exists());
    }

    #[test]
    fn test_commit_writes_backup() {
        let source = "elements_subdir(Foo)\n";
        let sandbox = Sandbox::new(source);
        let mut ctx = ModuleContext::load(sandbox.dir(), sandbox.config()).unwrap();
        add_dependencies(&mut ctx.document, &["ElementsKernel".to_string()], &[]);

        let commit = ctx.commit().unwrap();

        assert_eq!(
            commit,
            Commit::Written {
                backup: Some(sandbox.path("CMakeLists.txt~"))
            }
        );
        assert_eq!(sandbox.read("CMakeLists.txt~"), source);
        assert_eq!(
            sandbox.read("CMakeLists.txt"),
            "elements_subdir(Foo)\nelements_depends_on_subdirs(ElementsKernel)\n"
        );
        assert!(!ctx.is_changed());
    }

    #[test]
    fn test_commit_without_backup() {
        let sandbox = Sandbox::new("elements_subdir(Foo)\n");
        let config = Config {
            backup: false,
            ..sandbox.config()
        };
        let mut ctx = ModuleContext::load(sandbox.dir(), config).unwrap();
        add_dependencies(&mut ctx.document, &[], &["Boost".to_string()]);

        assert_eq!(ctx.commit().unwrap(), Commit::Written { backup: None });
        assert!(!sandbox.path("CMakeLists.txt~").exists());
    }

    #[test]
    fn test_conf_file_header() {
        let header = conf_file_header("Prog");
        assert!(header.starts_with("#####"));
        assert!(header.contains("<Prog>"));
    }
}
