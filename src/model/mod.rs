//! Document model: segments, typed macro nodes, and the mutators layered on
//! top of them.
//!
//! # Usage
//!
//! ```ignore
//! use elements_cmake::{parse, render};
//! use elements_cmake::grammar::ListField;
//! use elements_cmake::model::{append_unique_values, ensure_library};
//!
//! let mut doc = parse("elements_subdir(Foo)\n")?;
//! let lib = ensure_library(&mut doc, "Foo");
//! append_unique_values(lib, ListField::Sources, ["src/lib/Bar.cpp"])?;
//! let text = render(&doc);
//! ```

mod document;
mod mutate;
pub mod node;

pub use document::{Document, Invocation, NodeSummary, Segment};
pub use mutate::{
    append_unique_values, ensure_executable, ensure_install_flag, ensure_library,
    ensure_module_dependency, ensure_module_library, ensure_package_dependency,
    ensure_python_executable, ensure_unit_test,
};
pub use node::{
    Executable, Library, MacroNode, ModuleDependency, Package, PythonExecutable, Subdir,
    UnitTest, ValueList,
};
