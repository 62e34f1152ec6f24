// src/tasks/integration.rs

use std::path::Path;

use tracing::info;

use crate::dag::names;
use crate::errors::{LitdagError, Result};
use crate::exec::run_shell;
use crate::fs::{FileSystem, glob_files};

/// Run the configured integration command against the generated examples.
///
/// The examples are discovered through `examples_glob` rather than handed
/// over by the generate task. Without a command this is a no-op.
pub async fn run_integration(
    fs: &dyn FileSystem,
    root: &Path,
    examples_glob: &str,
    cmd: Option<&str>,
) -> Result<()> {
    let Some(cmd) = cmd else {
        info!("no [integration].cmd configured; nothing to run");
        return Ok(());
    };

    let examples = glob_files(fs, root, examples_glob)?;
    let args: Vec<String> = examples
        .iter()
        .filter_map(|p| p.strip_prefix(root).ok())
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    info!(cmd, examples = args.len(), "running integration command");

    let code = run_shell(names::INTEGRATION, cmd, &args, root).await?;
    if code != 0 {
        return Err(LitdagError::TaskFailed {
            task: names::INTEGRATION.to_string(),
            reason: format!("`{cmd}` exited with code {code}"),
        });
    }
    Ok(())
}
