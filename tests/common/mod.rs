#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub use litdag_test_utils::{
    ConfigFileBuilder, FakeExecutor, TaskConfigBuilder, init_tracing, with_timeout,
};

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A tutorial with one fenced Python block.
pub fn tutorial(code: &str) -> String {
    format!("# Tutorial\n\nSome prose.\n\n```python\n{code}\n```\n\nMore prose.\n")
}
