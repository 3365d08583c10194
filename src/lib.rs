//! elements-cmake - Round-trip editing of Elements CMakeLists.txt files
//!
//! A library for parsing a module's CMakeLists.txt into a document of typed
//! macro nodes and opaque text, mutating it with idempotent ensure-by-name
//! operations, and rendering it back with every untouched byte preserved.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod grammar;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;
pub mod scaffold;

pub use config::Config;
pub use error::{CmakeError, Result};
pub use grammar::{InstallFlag, ListField, MacroKind};
pub use model::{
    append_unique_values, ensure_executable, ensure_install_flag, ensure_library,
    ensure_module_dependency, ensure_module_library, ensure_package_dependency,
    ensure_python_executable, ensure_unit_test, Document, MacroNode, Segment, ValueList,
};
pub use parser::parse;
pub use render::{render, render_node};
pub use scaffold::ModuleContext;
