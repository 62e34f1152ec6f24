// src/rename.rs

//! Output-name derivation for generated examples.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Leading ordering prefix such as `01_`. Unlike a single `^[0-9]+_` strip,
/// repeated prefixes (`01_02_x` -> `x`, not `02_x`) are removed together so
/// the transform is idempotent.
static ORDER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+_)+").unwrap_or_else(|e| panic!("ORDER_PREFIX regex: {e}"))
});

/// Remove the leading ordering prefix from a file name.
///
/// `01_intro.py` -> `intro.py`; `intro.py` is returned unchanged.
pub fn strip_order_prefix(name: &str) -> Cow<'_, str> {
    ORDER_PREFIX.replace(name, "")
}

/// Apply [`strip_order_prefix`] to the last component of `path`, keeping its
/// directory.
pub fn transform_path(path: &Path) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path.to_path_buf();
    };
    match strip_order_prefix(name) {
        Cow::Borrowed(_) => path.to_path_buf(),
        Cow::Owned(stripped) => path.with_file_name(stripped),
    }
}

/// File name of the example generated from `source`.
///
/// The `.md` suffix is dropped and `extension` appended unless the stem
/// already ends with it (`intro.md` -> `intro.py`, `setup.py.md` ->
/// `setup.py`, `setup.sh.md` -> `setup.sh.py`). Every output therefore
/// carries the configured extension. Finally the ordering prefix is stripped.
pub fn output_file_name(source: &Path, extension: &str) -> Option<String> {
    let name = source.file_name()?.to_str()?;
    let stem = name
        .strip_suffix(".md")
        .or_else(|| name.strip_suffix(".markdown"))
        .unwrap_or(name);

    let has_ext = Path::new(stem)
        .extension()
        .is_some_and(|ext| ext == extension);
    let with_ext = if has_ext {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    };

    Some(strip_order_prefix(&with_ext).into_owned())
}
