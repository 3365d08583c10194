//! Name validation and derived names for generated files.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CmakeError, Result};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid name regex"));

/// Check a program or module name.
pub fn validate_name(what: &str, name: &str) -> Result<()> {
    if NAME_RE.is_match(name) {
        return Ok(());
    }
    Err(CmakeError::Scaffold {
        message: format!("Invalid {what} name: '{name}'"),
        help: Some(
            "Names start with a letter or digit and contain only letters, digits, '_' and '-'"
                .to_string(),
        ),
    })
}

/// Split `sub/dir/Class` into (`sub/dir`, `Class`).
pub fn split_class_path(path: &str) -> Result<(String, String)> {
    let trimmed = path.trim_matches('/');
    let (subdir, class) = match trimmed.rsplit_once('/') {
        Some((subdir, class)) => (subdir.trim_end_matches('/'), class),
        None => ("", trimmed),
    };
    if class.is_empty() || subdir.split('/').any(|part| part == "..") {
        return Err(CmakeError::Scaffold {
            message: format!("Invalid class path: '{path}'"),
            help: Some("Use <ClassName> or <sub/dir/ClassName>".to_string()),
        });
    }
    validate_name("class", class)?;
    Ok((subdir.to_string(), class.to_string()))
}

/// Join non-empty parts with '/'.
pub fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Include guard for a public header path such as `Foo/sub/Bar.h`.
pub fn include_guard(header: &str) -> String {
    format!("_{}", header.replace(['.', '/'], "_")).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("program", "MyProgram").is_ok());
        assert!(validate_name("program", "my-prog_2").is_ok());
        assert!(validate_name("program", "2fast").is_ok());
        assert!(validate_name("program", "_hidden").is_err());
        assert!(validate_name("program", "has space").is_err());
        assert!(validate_name("program", "").is_err());
    }

    #[test]
    fn test_split_class_path() {
        assert_eq!(
            split_class_path("Bar").unwrap(),
            (String::new(), "Bar".to_string())
        );
        assert_eq!(
            split_class_path("geometry/shapes/Circle").unwrap(),
            ("geometry/shapes".to_string(), "Circle".to_string())
        );
        assert_eq!(
            split_class_path("/Bar/").unwrap(),
            (String::new(), "Bar".to_string())
        );
        assert!(split_class_path("").is_err());
        assert!(split_class_path("../Escape").is_err());
    }

    #[test]
    fn test_join_skips_empty_subdir() {
        assert_eq!(join(&["src/lib", "", "Bar.cpp"]), "src/lib/Bar.cpp");
        assert_eq!(join(&["src/lib", "sub", "Bar.cpp"]), "src/lib/sub/Bar.cpp");
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("Foo/Bar.h"), "_FOO_BAR_H");
        assert_eq!(include_guard("Foo/geo/Circle.h"), "_FOO_GEO_CIRCLE_H");
    }
}
