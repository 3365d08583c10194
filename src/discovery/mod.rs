//! Finding CMakeLists.txt files for `check` and `fmt`.
//!
//! # Example
//!
//! ```ignore
//! use elements_cmake::discovery::find_cmake_lists;
//!
//! let files = find_cmake_lists(&["./MyProject".into()])?;
//! println!("Found {} files", files.len());
//! ```

mod scanner;

pub use scanner::{find_cmake_lists, is_cmake_lists, scan_directory};
