//! Typed macro nodes.

use serde::Serialize;

use crate::grammar::{Arguments, InstallFlag, ListField, MacroKind, GRAMMAR};

/// An ordered list of argument tokens.
///
/// Appends never introduce duplicates. Values are stored as they appear in
/// the file, so quoted tokens keep their quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueList(Vec<String>);

impl ValueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed tokens, dropping repeated values.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let mut list = Self::new();
        for token in tokens {
            list.push_unique(token);
        }
        list
    }

    /// Build from tokens kept exactly as written (extra arguments).
    pub fn verbatim(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|v| v == token)
    }

    /// Append a token unless it is already present. Returns whether it was added.
    pub fn push_unique(&mut self, token: String) -> bool {
        if self.contains(&token) {
            false
        } else {
            self.0.push(token);
            true
        }
    }

    /// Append plain values (quoted as needed) that are not present yet.
    pub fn append_unique<I, S>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter(|v| self.push_unique(to_token(v.as_ref())))
            .count()
    }

    /// Append a keyword followed by its values, without deduplicating.
    pub fn push_group(&mut self, keyword: String, values: Vec<String>) {
        self.0.push(keyword);
        self.0.extend(values);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for ValueList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        list.append_unique(iter);
        list
    }
}

fn is_keyword(value: &str) -> bool {
    GRAMMAR
        .iter()
        .flat_map(|s| s.keywords.iter())
        .any(|k| k.token == value)
}

/// Turn a plain value into an argument token, quoting it when it would not
/// survive as a single unquoted argument.
pub fn to_token(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return value.to_string();
    }
    let needs_quotes = value.is_empty()
        || is_keyword(value)
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '#' | '"' | ';'));
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subdir {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    /// Positional arguments after the name (version, `REQUIRED`, ...).
    pub args: Vec<String>,
    pub components: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDependency {
    pub names: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    pub name: String,
    pub sources: ValueList,
    pub link_libraries: ValueList,
    pub include_dirs: ValueList,
    pub public_headers: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Executable {
    pub name: String,
    pub source: String,
    pub link_libraries: ValueList,
    pub include_dirs: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitTest {
    pub name: String,
    pub sources: ValueList,
    pub link_libraries: ValueList,
    pub include_dirs: ValueList,
    /// Value of the `TYPE` keyword (`Boost`, `CppUnit`, ...).
    pub framework: Option<String>,
    /// Keyword groups kept verbatim (`EXECUTABLE`, `TIMEOUT`, ...).
    pub extra_args: ValueList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonExecutable {
    pub name: String,
    /// Dotted python module path, e.g. `MyModule.MyProgram`.
    pub module: String,
}

/// Sources listed right after the name, then those under `SOURCES`.
fn sources(args: &mut Arguments) -> ValueList {
    let mut tokens = std::mem::take(&mut args.implicit);
    tokens.extend(args.take(ListField::Sources));
    ValueList::from_tokens(tokens)
}

/// A recognized macro invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroNode {
    Subdir(Subdir),
    Package(Package),
    ModuleDependency(ModuleDependency),
    Library(Library),
    Executable(Executable),
    UnitTest(UnitTest),
    PythonExecutable(PythonExecutable),
    InstallFlag(InstallFlag),
}

impl MacroNode {
    pub fn kind(&self) -> MacroKind {
        match self {
            MacroNode::Subdir(_) => MacroKind::Subdir,
            MacroNode::Package(_) => MacroKind::Package,
            MacroNode::ModuleDependency(_) => MacroKind::ModuleDependency,
            MacroNode::Library(_) => MacroKind::Library,
            MacroNode::Executable(_) => MacroKind::Executable,
            MacroNode::UnitTest(_) => MacroKind::UnitTest,
            MacroNode::PythonExecutable(_) => MacroKind::PythonExecutable,
            MacroNode::InstallFlag(flag) => MacroKind::InstallFlag(*flag),
        }
    }

    /// The key name. Empty for flags; the first listed module for
    /// module dependencies.
    pub fn name(&self) -> &str {
        match self {
            MacroNode::Subdir(n) => &n.name,
            MacroNode::Package(n) => &n.name,
            MacroNode::ModuleDependency(n) => n.names.iter().next().unwrap_or(""),
            MacroNode::Library(n) => &n.name,
            MacroNode::Executable(n) => &n.name,
            MacroNode::UnitTest(n) => &n.name,
            MacroNode::PythonExecutable(n) => &n.name,
            MacroNode::InstallFlag(_) => "",
        }
    }

    /// Whether this node answers to `name` in a by-name lookup. The plain
    /// value and its token form both match, so `My Lib` finds `"My Lib"`.
    pub fn matches_name(&self, name: &str) -> bool {
        let token = to_token(name);
        match self {
            MacroNode::ModuleDependency(n) => n.names.contains(name) || n.names.contains(&token),
            MacroNode::InstallFlag(_) => true,
            other => other.name() == name || other.name() == token,
        }
    }

    pub fn list(&self, field: ListField) -> Option<&ValueList> {
        let list = match (self, field) {
            (MacroNode::Package(n), ListField::Components) => &n.components,
            (MacroNode::ModuleDependency(n), ListField::Names) => &n.names,
            (MacroNode::Library(n), ListField::Sources) => &n.sources,
            (MacroNode::Library(n), ListField::LinkLibraries) => &n.link_libraries,
            (MacroNode::Library(n), ListField::IncludeDirs) => &n.include_dirs,
            (MacroNode::Library(n), ListField::PublicHeaders) => &n.public_headers,
            (MacroNode::Executable(n), ListField::LinkLibraries) => &n.link_libraries,
            (MacroNode::Executable(n), ListField::IncludeDirs) => &n.include_dirs,
            (MacroNode::UnitTest(n), ListField::Sources) => &n.sources,
            (MacroNode::UnitTest(n), ListField::LinkLibraries) => &n.link_libraries,
            (MacroNode::UnitTest(n), ListField::IncludeDirs) => &n.include_dirs,
            (MacroNode::UnitTest(n), ListField::ExtraArgs) => &n.extra_args,
            _ => return None,
        };
        Some(list)
    }

    pub fn list_mut(&mut self, field: ListField) -> Option<&mut ValueList> {
        let list = match (self, field) {
            (MacroNode::Package(n), ListField::Components) => &mut n.components,
            (MacroNode::ModuleDependency(n), ListField::Names) => &mut n.names,
            (MacroNode::Library(n), ListField::Sources) => &mut n.sources,
            (MacroNode::Library(n), ListField::LinkLibraries) => &mut n.link_libraries,
            (MacroNode::Library(n), ListField::IncludeDirs) => &mut n.include_dirs,
            (MacroNode::Library(n), ListField::PublicHeaders) => &mut n.public_headers,
            (MacroNode::Executable(n), ListField::LinkLibraries) => &mut n.link_libraries,
            (MacroNode::Executable(n), ListField::IncludeDirs) => &mut n.include_dirs,
            (MacroNode::UnitTest(n), ListField::Sources) => &mut n.sources,
            (MacroNode::UnitTest(n), ListField::LinkLibraries) => &mut n.link_libraries,
            (MacroNode::UnitTest(n), ListField::IncludeDirs) => &mut n.include_dirs,
            (MacroNode::UnitTest(n), ListField::ExtraArgs) => &mut n.extra_args,
            _ => return None,
        };
        Some(list)
    }

    /// Build a typed node from classified arguments.
    ///
    /// Returns `None` for shapes the schema accepts but the node cannot hold
    /// (a module dependency without names).
    pub fn from_arguments(kind: MacroKind, mut args: Arguments) -> Option<Self> {
        let mut positional = std::mem::take(&mut args.positional).into_iter();

        let node = match kind {
            MacroKind::Subdir => MacroNode::Subdir(Subdir { name: positional.next()? }),
            MacroKind::Package => {
                let name = positional.next()?;
                let rest: Vec<String> = positional.collect();
                MacroNode::Package(Package {
                    name,
                    args: rest,
                    components: ValueList::from_tokens(args.take(ListField::Components)),
                })
            }
            MacroKind::ModuleDependency => {
                if args.implicit.is_empty() {
                    return None;
                }
                MacroNode::ModuleDependency(ModuleDependency {
                    names: ValueList::from_tokens(args.implicit),
                })
            }
            MacroKind::Library => MacroNode::Library(Library {
                name: positional.next()?,
                link_libraries: ValueList::from_tokens(args.take(ListField::LinkLibraries)),
                include_dirs: ValueList::from_tokens(args.take(ListField::IncludeDirs)),
                public_headers: ValueList::from_tokens(args.take(ListField::PublicHeaders)),
                sources: sources(&mut args),
            }),
            MacroKind::Executable => MacroNode::Executable(Executable {
                name: positional.next()?,
                source: positional.next()?,
                link_libraries: ValueList::from_tokens(args.take(ListField::LinkLibraries)),
                include_dirs: ValueList::from_tokens(args.take(ListField::IncludeDirs)),
            }),
            MacroKind::UnitTest => MacroNode::UnitTest(UnitTest {
                name: positional.next()?,
                link_libraries: ValueList::from_tokens(args.take(ListField::LinkLibraries)),
                include_dirs: ValueList::from_tokens(args.take(ListField::IncludeDirs)),
                sources: sources(&mut args),
                framework: args.framework,
                extra_args: ValueList::verbatim(args.extra),
            }),
            MacroKind::PythonExecutable => MacroNode::PythonExecutable(PythonExecutable {
                name: positional.next()?,
                module: positional.next()?,
            }),
            MacroKind::InstallFlag(flag) => MacroNode::InstallFlag(flag),
        };

        Some(node)
    }

    pub fn as_library_mut(&mut self) -> Option<&mut Library> {
        match self {
            MacroNode::Library(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_executable_mut(&mut self) -> Option<&mut Executable> {
        match self {
            MacroNode::Executable(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_unit_test_mut(&mut self) -> Option<&mut UnitTest> {
        match self {
            MacroNode::UnitTest(n) => Some(n),
            _ => None,
        }
    }
}
