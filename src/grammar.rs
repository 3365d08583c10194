//! The fixed table of recognized Elements CMake commands.
//!
//! Each [`Schema`] describes how an invocation's argument tokens are laid
//! out: a number of leading positional tokens, an optional implicit list that
//! collects the remaining leading tokens, and keyword groups. Anything that
//! does not fit its schema is left to the parser to keep as opaque text.

use std::fmt;

use serde::Serialize;

/// Installation flag macros. Each takes no arguments and appears at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallFlag {
    PythonModules,
    ConfFiles,
    Scripts,
}

impl InstallFlag {
    pub const ALL: [InstallFlag; 3] = [
        InstallFlag::PythonModules,
        InstallFlag::ConfFiles,
        InstallFlag::Scripts,
    ];
}

/// Every recognized macro kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroKind {
    Subdir,
    Package,
    ModuleDependency,
    Library,
    Executable,
    UnitTest,
    PythonExecutable,
    InstallFlag(InstallFlag),
}

impl MacroKind {
    /// The canonical (lower-case) command name.
    pub fn command(self) -> &'static str {
        match self {
            MacroKind::Subdir => "elements_subdir",
            MacroKind::Package => "find_package",
            MacroKind::ModuleDependency => "elements_depends_on_subdirs",
            MacroKind::Library => "elements_add_library",
            MacroKind::Executable => "elements_add_executable",
            MacroKind::UnitTest => "elements_add_unit_test",
            MacroKind::PythonExecutable => "elements_add_python_program",
            MacroKind::InstallFlag(InstallFlag::PythonModules) => "elements_install_python_modules",
            MacroKind::InstallFlag(InstallFlag::ConfFiles) => "elements_install_conf_files",
            MacroKind::InstallFlag(InstallFlag::Scripts) => "elements_install_scripts",
        }
    }

    /// Whether nodes of this kind are keyed by a target name.
    pub fn is_target(self) -> bool {
        matches!(
            self,
            MacroKind::Library
                | MacroKind::Executable
                | MacroKind::UnitTest
                | MacroKind::PythonExecutable
        )
    }

    pub fn schema(self) -> &'static Schema {
        GRAMMAR
            .iter()
            .find(|s| s.kind == self)
            .unwrap_or(&GRAMMAR[0])
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Named list fields across all macro kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Sources,
    LinkLibraries,
    IncludeDirs,
    PublicHeaders,
    Components,
    Names,
    ExtraArgs,
}

impl fmt::Display for ListField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListField::Sources => "sources",
            ListField::LinkLibraries => "link libraries",
            ListField::IncludeDirs => "include dirs",
            ListField::PublicHeaders => "public headers",
            ListField::Components => "components",
            ListField::Names => "names",
            ListField::ExtraArgs => "extra args",
        };
        f.write_str(name)
    }
}

/// What a keyword token switches the parser into collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Values go to a list field.
    List(ListField),
    /// Exactly one value (the unit test framework).
    Framework,
    /// The keyword and its values are kept verbatim as extra arguments.
    Extra,
    /// A real option of the command that this model does not represent;
    /// its presence makes the invocation opaque.
    Foreign,
}

#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub token: &'static str,
    pub group: Group,
}

const fn kw(token: &'static str, group: Group) -> Keyword {
    Keyword { token, group }
}

/// Argument layout of one command.
#[derive(Debug)]
pub struct Schema {
    pub kind: MacroKind,
    /// Minimum number of leading positional tokens.
    pub min_positional: usize,
    /// Maximum number of leading positional tokens; `None` is unbounded.
    pub max_positional: Option<usize>,
    /// List collecting leading tokens past `max_positional`.
    pub implicit: Option<ListField>,
    pub keywords: &'static [Keyword],
}

pub const SOURCES: &str = "SOURCES";
pub const LINK_LIBRARIES: &str = "LINK_LIBRARIES";
pub const INCLUDE_DIRS: &str = "INCLUDE_DIRS";
pub const PUBLIC_HEADERS: &str = "PUBLIC_HEADERS";
pub const COMPONENTS: &str = "COMPONENTS";
pub const TYPE: &str = "TYPE";

const TARGET_KEYWORDS: &[Keyword] = &[
    kw(LINK_LIBRARIES, Group::List(ListField::LinkLibraries)),
    kw(INCLUDE_DIRS, Group::List(ListField::IncludeDirs)),
];

/// `SOURCES` is optional: sources may also follow the name directly. Both
/// forms feed the same list.
const LIBRARY_KEYWORDS: &[Keyword] = &[
    kw(SOURCES, Group::List(ListField::Sources)),
    kw(LINK_LIBRARIES, Group::List(ListField::LinkLibraries)),
    kw(INCLUDE_DIRS, Group::List(ListField::IncludeDirs)),
    kw(PUBLIC_HEADERS, Group::List(ListField::PublicHeaders)),
];

const UNIT_TEST_KEYWORDS: &[Keyword] = &[
    kw(SOURCES, Group::List(ListField::Sources)),
    kw(LINK_LIBRARIES, Group::List(ListField::LinkLibraries)),
    kw(INCLUDE_DIRS, Group::List(ListField::IncludeDirs)),
    kw(TYPE, Group::Framework),
    kw("EXECUTABLE", Group::Extra),
    kw("ENVIRONMENT", Group::Extra),
    kw("LABELS", Group::Extra),
    kw("WORKING_DIRECTORY", Group::Extra),
    kw("TIMEOUT", Group::Extra),
];

const PACKAGE_KEYWORDS: &[Keyword] = &[
    kw(COMPONENTS, Group::List(ListField::Components)),
    kw("OPTIONAL_COMPONENTS", Group::Foreign),
    kw("NAMES", Group::Foreign),
    kw("CONFIGS", Group::Foreign),
    kw("HINTS", Group::Foreign),
    kw("PATHS", Group::Foreign),
    kw("PATH_SUFFIXES", Group::Foreign),
];

const fn flag(flag: InstallFlag) -> Schema {
    Schema {
        kind: MacroKind::InstallFlag(flag),
        min_positional: 0,
        max_positional: Some(0),
        implicit: None,
        keywords: &[],
    }
}

/// The recognized-macro table.
pub static GRAMMAR: [Schema; 10] = [
    Schema {
        kind: MacroKind::Subdir,
        min_positional: 1,
        max_positional: Some(1),
        implicit: None,
        keywords: &[],
    },
    Schema {
        kind: MacroKind::Package,
        min_positional: 1,
        max_positional: None,
        implicit: None,
        keywords: PACKAGE_KEYWORDS,
    },
    Schema {
        kind: MacroKind::ModuleDependency,
        min_positional: 0,
        max_positional: Some(0),
        implicit: Some(ListField::Names),
        keywords: &[],
    },
    Schema {
        kind: MacroKind::Library,
        min_positional: 1,
        max_positional: Some(1),
        implicit: Some(ListField::Sources),
        keywords: LIBRARY_KEYWORDS,
    },
    Schema {
        kind: MacroKind::Executable,
        min_positional: 2,
        max_positional: Some(2),
        implicit: None,
        keywords: TARGET_KEYWORDS,
    },
    Schema {
        kind: MacroKind::UnitTest,
        min_positional: 1,
        max_positional: Some(1),
        implicit: Some(ListField::Sources),
        keywords: UNIT_TEST_KEYWORDS,
    },
    Schema {
        kind: MacroKind::PythonExecutable,
        min_positional: 2,
        max_positional: Some(2),
        implicit: None,
        keywords: &[],
    },
    flag(InstallFlag::PythonModules),
    flag(InstallFlag::ConfFiles),
    flag(InstallFlag::Scripts),
];

/// Find the schema for a command name (case-insensitive, like CMake).
pub fn lookup(command: &str) -> Option<&'static Schema> {
    GRAMMAR
        .iter()
        .find(|s| s.kind.command().eq_ignore_ascii_case(command))
}

/// An argument token as split by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Quoted or bracket argument; never a keyword.
    pub quoted: bool,
}

/// Argument tokens sorted into the slots of a schema.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arguments {
    pub positional: Vec<String>,
    pub implicit: Vec<String>,
    pub groups: Vec<(ListField, Vec<String>)>,
    pub framework: Option<String>,
    pub extra: Vec<String>,
}

impl Arguments {
    /// Values collected for a keyword list field (empty if absent).
    pub fn take(&mut self, field: ListField) -> Vec<String> {
        match self.groups.iter().position(|(f, _)| *f == field) {
            Some(i) => self.groups.remove(i).1,
            None => Vec::new(),
        }
    }
}

impl Schema {
    /// Whether `token` opens a group that is kept verbatim in extra arguments.
    pub fn is_extra_keyword(&self, token: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| k.group == Group::Extra && k.token == token)
    }

    fn keyword(&self, token: &Token<'_>) -> Option<&'static Keyword> {
        if token.quoted {
            return None;
        }
        self.keywords.iter().find(|k| k.token == token.text)
    }

    /// Sort tokens into this schema's slots.
    ///
    /// Returns `None` when the shape does not match: too few or too many
    /// positional tokens, a repeated keyword, a foreign keyword, or a
    /// framework group without exactly one value.
    pub fn classify(&self, tokens: &[Token<'_>]) -> Option<Arguments> {
        let mut args = Arguments::default();
        let mut current: Option<&'static Keyword> = None;
        let mut seen: Vec<&'static str> = Vec::new();
        let mut framework_values: Vec<String> = Vec::new();

        for token in tokens {
            if let Some(keyword) = self.keyword(token) {
                if seen.contains(&keyword.token) {
                    return None;
                }
                seen.push(keyword.token);
                match keyword.group {
                    Group::Foreign => return None,
                    Group::List(field) => args.groups.push((field, Vec::new())),
                    Group::Extra => args.extra.push(keyword.token.to_string()),
                    Group::Framework => {}
                }
                current = Some(keyword);
                continue;
            }

            let value = token.text.to_string();
            match current.map(|k| k.group) {
                None => {
                    let room = self
                        .max_positional
                        .map_or(true, |max| args.positional.len() < max);
                    if room {
                        args.positional.push(value);
                    } else if self.implicit.is_some() {
                        args.implicit.push(value);
                    } else {
                        return None;
                    }
                }
                Some(Group::List(_)) => {
                    if let Some((_, values)) = args.groups.last_mut() {
                        values.push(value);
                    }
                }
                Some(Group::Framework) => framework_values.push(value),
                Some(Group::Extra) => args.extra.push(value),
                Some(Group::Foreign) => return None,
            }
        }

        if args.positional.len() < self.min_positional {
            return None;
        }
        if seen.contains(&TYPE) {
            if framework_values.len() != 1 {
                return None;
            }
            args.framework = framework_values.pop();
        }

        Some(args)
    }
}
