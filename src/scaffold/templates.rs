//! Template lookup and placeholder substitution.
//!
//! Templates live in `ElementsKernel/templates/` below one of the aux path
//! directories. Placeholders are written `%(KEY)s`; `%%` is a literal `%`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{CmakeError, Result};

pub const TEMPLATE_SUBDIR: &str = "ElementsKernel/templates";

pub const CLASS_HEADER_TEMPLATE: &str = "ClassName_template.h";
pub const CLASS_SOURCE_TEMPLATE: &str = "ClassName_template.cpp";
pub const UNIT_TEST_TEMPLATE: &str = "UnitTestFile_template.cpp";
pub const PROGRAM_TEMPLATE: &str = "program_template.cpp";
pub const PYTHON_PROGRAM_TEMPLATE: &str = "PythonProgram_template.py";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\(([A-Za-z_][A-Za-z0-9_]*)\)s|%%").expect("valid placeholder regex"));

/// Placeholder values, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Substitutions(BTreeMap<&'static str, String>);

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Locate `file` in the first aux directory that has it.
pub fn find_template(aux_path: &[PathBuf], file: &str) -> Result<PathBuf> {
    aux_path
        .iter()
        .map(|dir| dir.join(TEMPLATE_SUBDIR).join(file))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| CmakeError::Template {
            message: format!("{file} not found in the aux path"),
            help: Some(if aux_path.is_empty() {
                "Set ELEMENTS_AUX_PATH or aux_path in elements.yaml".to_string()
            } else {
                format!(
                    "Searched: {}",
                    aux_path
                        .iter()
                        .map(|p| p.join(TEMPLATE_SUBDIR).display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }),
        })
}

/// Replace every placeholder in `template`. Unknown keys are an error.
pub fn substitute(template: &str, values: &Substitutions) -> Result<String> {
    let missing: Vec<&str> = PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str())
        .filter(|key| values.get(key).is_none())
        .collect();
    if let Some(key) = missing.first() {
        return Err(CmakeError::Template {
            message: format!("unknown placeholder %({key})s"),
            help: Some("Check the template against the scaffolding command that uses it".to_string()),
        });
    }

    let out = PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
        Some(key) => values.get(key.as_str()).unwrap_or_default().to_string(),
        None => "%".to_string(),
    });
    Ok(out.into_owned())
}

/// Read `template`, substitute, and write the result to `dest`.
pub fn instantiate(template: &Path, dest: &Path, values: &Substitutions) -> Result<()> {
    let text = fs::read_to_string(template).map_err(|e| CmakeError::Io {
        path: template.to_path_buf(),
        message: format!("Failed to read template: {}", e),
    })?;
    let text = substitute(&text, values)?;
    fs::write(dest, text).map_err(|e| CmakeError::Io {
        path: dest.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })
}
